//! Page Models
//!
//! The small value types the behaviors pass around.

/// Display theme, persisted as "light" / "dark"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Anything other than "dark" reads as light
    pub fn from_stored(s: &str) -> Self {
        match s {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Text direction, persisted as "ltr" / "rtl"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }

    /// Anything other than "rtl" reads as ltr
    pub fn from_stored(s: &str) -> Self {
        match s {
            "rtl" => Direction::Rtl,
            _ => Direction::Ltr,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Direction::Ltr => Direction::Rtl,
            Direction::Rtl => Direction::Ltr,
        }
    }

    /// Toggle button caption for a page currently in this direction
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Ltr => "EN",
            Direction::Rtl => "AR",
        }
    }
}

/// Which price column the pricing table shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BillingPeriod {
    #[default]
    Monthly,
    Yearly,
}

impl BillingPeriod {
    /// Data attribute holding the price string for this period
    pub fn price_attribute(&self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "data-monthly",
            BillingPeriod::Yearly => "data-yearly",
        }
    }
}

/// Unit a countdown cell renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl CountdownUnit {
    /// Unknown unit names fall back to seconds
    pub fn from_attr(s: &str) -> Self {
        match s {
            "days" => CountdownUnit::Days,
            "hours" => CountdownUnit::Hours,
            "minutes" => CountdownUnit::Minutes,
            _ => CountdownUnit::Seconds,
        }
    }
}

const SECOND_MS: i64 = 1000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Time left until a deadline, split into display units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    /// Split `distance_ms`; a deadline already passed is all zeros
    pub fn from_millis(distance_ms: i64) -> Self {
        let distance = distance_ms.max(0);
        Self {
            days: distance / DAY_MS,
            hours: (distance % DAY_MS) / HOUR_MS,
            minutes: (distance % HOUR_MS) / MINUTE_MS,
            seconds: (distance % MINUTE_MS) / SECOND_MS,
        }
    }

    pub fn get(&self, unit: CountdownUnit) -> i64 {
        match unit {
            CountdownUnit::Days => self.days,
            CountdownUnit::Hours => self.hours,
            CountdownUnit::Minutes => self.minutes,
            CountdownUnit::Seconds => self.seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_stored() {
        assert_eq!(Theme::from_stored("dark"), Theme::Dark);
        assert_eq!(Theme::from_stored("light"), Theme::Light);
        assert_eq!(Theme::from_stored("solarized"), Theme::Light);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn test_direction_label_follows_direction() {
        assert_eq!(Direction::Rtl.label(), "AR");
        assert_eq!(Direction::Ltr.label(), "EN");
        assert_eq!(Direction::from_stored("rtl"), Direction::Rtl);
        assert_eq!(Direction::from_stored(""), Direction::Ltr);
    }

    #[test]
    fn test_countdown_unit_fallback() {
        assert_eq!(CountdownUnit::from_attr("days"), CountdownUnit::Days);
        assert_eq!(CountdownUnit::from_attr("weeks"), CountdownUnit::Seconds);
    }

    #[test]
    fn test_remaining_split() {
        let distance = 3 * DAY_MS + 4 * HOUR_MS + 5 * MINUTE_MS + 6 * SECOND_MS + 999;
        let remaining = Remaining::from_millis(distance);
        assert_eq!(remaining, Remaining { days: 3, hours: 4, minutes: 5, seconds: 6 });
        assert_eq!(remaining.get(CountdownUnit::Minutes), 5);
    }

    #[test]
    fn test_remaining_past_deadline_is_zero() {
        assert_eq!(Remaining::from_millis(-5_000), Remaining::default());
    }
}
