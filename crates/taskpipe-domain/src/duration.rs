//! Duration conversion between upstream minute counts, human strings and day counts

/// Minutes per hour boundary for [`convert_time`]
const HOUR_MINUTES: i64 = 60;
/// Minutes per day boundary for [`convert_time`]
const DAY_MINUTES: i64 = 1440;

/// Render a minute count as the human string the datasets carry.
///
/// Below one hour the count stays in whole minutes; below one day it becomes
/// fractional hours; anything longer becomes fractional days. Fractions keep
/// one decimal place.
///
/// # Examples
///
/// ```
/// use taskpipe_domain::convert_time;
///
/// assert_eq!(convert_time(45), "45 minutos");
/// assert_eq!(convert_time(90), "1.5 horas");
/// assert_eq!(convert_time(2160), "1.5 dias");
/// ```
pub fn convert_time(time_in_minutes: i64) -> String {
    if time_in_minutes < HOUR_MINUTES {
        format!("{} minutos", time_in_minutes)
    } else if time_in_minutes < DAY_MINUTES {
        format!("{:.1} horas", time_in_minutes as f64 / HOUR_MINUTES as f64)
    } else {
        format!("{:.1} dias", time_in_minutes as f64 / DAY_MINUTES as f64)
    }
}

/// Parse a [`convert_time`] string back into a day count.
///
/// The numeric aggregation datasets want one comparable unit, so
/// `"90 minutos"`, `"1.5 horas"` and `"0.0625 dias"` all come back as the
/// same 0.0625. Unrecognized input yields 0.0 rather than an error; the
/// history rows tolerate individual bad entries.
pub fn convert_time_to_days(human: &str) -> f64 {
    let mut parts = human.split_whitespace();
    let value = match parts.next().and_then(|v| v.parse::<f64>().ok()) {
        Some(v) => v,
        None => return 0.0,
    };

    match parts.next() {
        Some("minutos") => value / DAY_MINUTES as f64,
        Some("horas") => value / 24.0,
        Some("dias") => value,
        _ => 0.0,
    }
}
