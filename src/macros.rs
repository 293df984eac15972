//! Convenience macros for KNX addresses.

/// Creates a [`GroupAddress`](crate::addressing::GroupAddress) from 3-level notation.
///
/// # Syntax
///
/// ```text
/// ga!(area/line/member)
/// ```
///
/// # Examples
///
/// ```
/// use knx_ip_node::ga;
///
/// let light = ga!(1/2/3);
/// assert_eq!(light.parts(), (1, 2, 3));
/// ```
///
/// # Compile-Time Validation
///
/// ```compile_fail
/// // area > 31
/// let addr = knx_ip_node::ga!(32/0/0);
/// ```
///
/// ```compile_fail
/// // line > 7
/// let addr = knx_ip_node::ga!(1/8/0);
/// ```
#[macro_export]
macro_rules! ga {
    ($area:literal / $line:literal / $member:literal) => {{
        const _: () = {
            if $area > 31 {
                panic!("Area must be 0-31");
            }
            if $line > 7 {
                panic!("Line must be 0-7");
            }
            if $member > 255 {
                panic!("Member must be 0-255");
            }
        };

        const RAW: u16 = (($area & 0x1F) << 11) | (($line & 0x07) << 8) | ($member & 0xFF);
        $crate::addressing::GroupAddress::from(RAW)
    }};
}

/// Creates an [`IndividualAddress`](crate::addressing::IndividualAddress) from dotted notation.
///
/// Components are separated by commas because `1.1.5` does not tokenize as
/// three literals.
///
/// ```
/// use knx_ip_node::ia;
///
/// let node = ia!(1, 1, 5);
/// assert_eq!(node.to_string(), "1.1.5");
/// ```
///
/// ```compile_fail
/// // area > 15
/// let addr = knx_ip_node::ia!(16, 0, 0);
/// ```
#[macro_export]
macro_rules! ia {
    ($area:literal, $line:literal, $member:literal) => {{
        const _: () = {
            if $area > 15 {
                panic!("Area must be 0-15");
            }
            if $line > 15 {
                panic!("Line must be 0-15");
            }
            if $member > 255 {
                panic!("Member must be 0-255");
            }
        };

        const RAW: u16 = (($area & 0x0F) << 12) | (($line & 0x0F) << 8) | ($member & 0xFF);
        $crate::addressing::IndividualAddress::from(RAW)
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_ga_macro() {
        let addr = ga!(1 / 2 / 3);
        assert_eq!(u16::from(addr), 0x0A03);
        assert_eq!(ga!(31 / 7 / 255).raw(), 0xFFFF);
    }

    #[test]
    fn test_ia_macro() {
        assert_eq!(ia!(1, 1, 0).raw(), 0x1100);
        assert_eq!(ia!(15, 15, 255).raw(), 0xFFFF);
    }
}
