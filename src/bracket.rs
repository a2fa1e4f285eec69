/// Age brackets: the derived `age_group` column.
///
/// Each bracket is a half-open range `[lower, upper)`. Ages outside every
/// range (negative, at or above 100, or NaN) map to [`AgeBracket::Unbracketed`],
/// which has the stable label `"unbracketed"`.
use std::fmt;

/// Label used for ages outside every bracket.
pub const UNBRACKETED_LABEL: &str = "unbracketed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeBracket {
    Under20,
    Twenties,
    Thirties,
    Forties,
    Fifties,
    SixtyPlus,
    Unbracketed,
}

impl AgeBracket {
    /// Every bracket in report order, `Unbracketed` last.
    pub const ALL: [AgeBracket; 7] = [
        AgeBracket::Under20,
        AgeBracket::Twenties,
        AgeBracket::Thirties,
        AgeBracket::Forties,
        AgeBracket::Fifties,
        AgeBracket::SixtyPlus,
        AgeBracket::Unbracketed,
    ];

    pub fn for_age(age: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|bracket| {
                bracket
                    .bounds()
                    .is_some_and(|(lower, upper)| age >= lower && age < upper)
            })
            .unwrap_or(AgeBracket::Unbracketed)
    }

    /// `(lower inclusive, upper exclusive)`, or `None` for `Unbracketed`.
    pub fn bounds(self) -> Option<(f64, f64)> {
        match self {
            AgeBracket::Under20 => Some((0.0, 20.0)),
            AgeBracket::Twenties => Some((20.0, 30.0)),
            AgeBracket::Thirties => Some((30.0, 40.0)),
            AgeBracket::Forties => Some((40.0, 50.0)),
            AgeBracket::Fifties => Some((50.0, 60.0)),
            AgeBracket::SixtyPlus => Some((60.0, 100.0)),
            AgeBracket::Unbracketed => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBracket::Under20 => "[0,20)",
            AgeBracket::Twenties => "[20,30)",
            AgeBracket::Thirties => "[30,40)",
            AgeBracket::Forties => "[40,50)",
            AgeBracket::Fifties => "[50,60)",
            AgeBracket::SixtyPlus => "[60,100)",
            AgeBracket::Unbracketed => UNBRACKETED_LABEL,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bracket| bracket.label() == label)
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_boundaries() {
        assert_eq!(AgeBracket::for_age(0.0), AgeBracket::Under20);
        assert_eq!(AgeBracket::for_age(19.0), AgeBracket::Under20);
        assert_eq!(AgeBracket::for_age(19.99), AgeBracket::Under20);
        assert_eq!(AgeBracket::for_age(20.0), AgeBracket::Twenties);
        assert_eq!(AgeBracket::for_age(59.0), AgeBracket::Fifties);
        assert_eq!(AgeBracket::for_age(60.0), AgeBracket::SixtyPlus);
        assert_eq!(AgeBracket::for_age(99.5), AgeBracket::SixtyPlus);
    }

    #[test]
    fn test_out_of_range_is_unbracketed() {
        assert_eq!(AgeBracket::for_age(100.0), AgeBracket::Unbracketed);
        assert_eq!(AgeBracket::for_age(150.0), AgeBracket::Unbracketed);
        assert_eq!(AgeBracket::for_age(-1.0), AgeBracket::Unbracketed);
        assert_eq!(AgeBracket::for_age(f64::NAN), AgeBracket::Unbracketed);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AgeBracket::for_age(19.0).label(), "[0,20)");
        assert_eq!(AgeBracket::for_age(20.0).label(), "[20,30)");
        assert_eq!(AgeBracket::for_age(150.0).label(), "unbracketed");
        assert_eq!(AgeBracket::SixtyPlus.to_string(), "[60,100)");

        for bracket in AgeBracket::ALL {
            assert_eq!(AgeBracket::from_label(bracket.label()), Some(bracket));
        }
        assert_eq!(AgeBracket::from_label("20대"), None);
    }

    #[test]
    fn test_report_order() {
        let mut shuffled = vec![AgeBracket::Unbracketed, AgeBracket::Forties, AgeBracket::Under20];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![AgeBracket::Under20, AgeBracket::Forties, AgeBracket::Unbracketed]
        );
    }
}
