//! Text rendering of reliability trees.
//!
//! Series links render as `[label: rate: child child]` and parallel links as
//! `<label: rate: child child>`, one child per line, aligned under the opening bracket. Components
//! render as `'id: rate'`. Rates are per hour and omitted when undefined.

use std::fmt::{self, Display};

use super::{node::ReliabilityNode, pool::Pool};

impl ReliabilityNode {
    pub fn display(&self, pool: &Pool) -> String {
        self.display_padded(pool, 0)
    }

    fn display_padded(&self, pool: &Pool, pad: usize) -> String {
        let (open, close, mut indent, separator_offset) = match self {
            Self::Component(component) => {
                return match self.failure_rate(pool) {
                    Some(rate) => format!("'{}: {}'", component.id, Scientific(rate)),
                    None => format!("'{}'", component.id),
                };
            }
            Self::Serial(_) => ('[', ']', pad, 0),
            Self::Parallel(_) => ('<', '>', pad + 2, 1),
        };

        let mut out = String::from(open);
        if let Some(label) = self.label() {
            match self.failure_rate(pool) {
                Some(rate) => out.push_str(&format!("{label}: {}: ", Scientific(rate))),
                None => out.push_str(&format!("{label}: ")),
            }
            indent += out.chars().count();
        }

        let newline = format!("\n{}", " ".repeat(indent - separator_offset));
        for key in self.children() {
            out.push_str(&pool[*key].display_padded(pool, indent));
            out.push(' ');
            out.push_str(&newline);
        }

        let mut out = out.trim_end().to_string();
        out.push(close);
        out
    }
}

/// Formats a float like C's `%e`: six decimals and an exponent of at least two digits.
pub(crate) struct Scientific(pub f64);

impl Display for Scientific {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = format!("{:.6e}", self.0);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                write!(f, "{mantissa}e{sign}{digits:0>2}")
            }
            None => f.write_str(&formatted),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{
        pool::Pool,
        test_utils::{component, pool_with_rates},
    };

    use super::*;

    #[test]
    fn test_scientific() {
        assert_eq!(Scientific(1.5e-5).to_string(), "1.500000e-05");
        assert_eq!(Scientific(123456.0).to_string(), "1.234560e+05");
        assert_eq!(Scientific(2e-120).to_string(), "2.000000e-120");
        assert_eq!(Scientific(0.0).to_string(), "0.000000e+00");
    }

    #[test]
    fn test_display_component() {
        let mut pool = Pool::new();
        let rated = component(&mut pool, "11", Some(2.0));
        let unrated = component(&mut pool, "12", None);
        assert_eq!(pool[rated].display(&pool), "'11: 2.000000e-06'");
        assert_eq!(pool[unrated].display(&pool), "'12'");
    }

    #[test]
    fn test_display_serial() {
        let (pool, root) = pool_with_rates(false, &[Some(1.0), None]);
        assert_eq!(
            pool[root].display(&pool),
            format!(
                "[link: 1.000000e-06: 'c0: 1.000000e-06' \n{}'c1']",
                " ".repeat(21)
            )
        );
    }

    #[test]
    fn test_display_nested() {
        let mut pool = Pool::new();
        let a = component(&mut pool, "a", None);
        let b = component(&mut pool, "b", None);
        let parallel = pool.insert(ReliabilityNode::new_parallel(None::<&str>, vec![a, b]));
        let root = pool.insert(ReliabilityNode::new_serial(Some("x"), vec![parallel]));
        assert_eq!(pool[root].display(&pool), "[x: <'a' \n     'b'>]");
    }
}
