use std::{fmt::Display, ops::Deref};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl Percentage {
    pub fn new_opt(value: f64) -> Option<Percentage> {
        if value < 0. {
            None
        } else {
            Some(Percentage(value))
        }
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Share of `value` in `whole`, rounded to a whole percent. An empty whole counts as 0% rather
/// than a division error.
pub fn count_percentage(value: u64, whole: u64) -> Percentage {
    if whole == 0 {
        return Percentage(0.);
    }
    Percentage::new_opt((value as f64 / whole as f64 * 100.).round())
        .expect("Percentage should always be at least 0")
}

#[cfg(test)]
mod tests {
    use super::count_percentage;

    #[test]
    fn shares_round_to_whole_percents() {
        assert_eq!(*count_percentage(7, 12), 58.);
        assert_eq!(*count_percentage(3, 12), 25.);
        assert_eq!(count_percentage(7, 12).to_string(), "58%");
    }

    #[test]
    fn empty_whole_is_zero_percent() {
        assert_eq!(*count_percentage(0, 0), 0.);
        assert_eq!(*count_percentage(5, 0), 0.);
    }
}
