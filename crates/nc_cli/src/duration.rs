use std::str::FromStr;
use std::time::Duration;

/// Durations such as `1500ms`, `2s`, `1m30s` or `1h`. A bare number is seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_millis = 0u64;
        let mut current_number = String::new();
        let mut has_value = false;
        let mut chars = s.trim().chars().peekable();

        while let Some(c) = chars.next() {
            if c.is_ascii_digit() {
                current_number.push(c);
                continue;
            }
            if c.is_whitespace() {
                continue;
            }

            let num: u64 = current_number
                .parse()
                .map_err(|_| format!("Missing number before unit '{}'", c))?;
            let unit_millis = match c {
                'm' if chars.peek() == Some(&'s') => {
                    chars.next();
                    1
                }
                's' => 1_000,
                'm' => 60_000,
                'h' => 3_600_000,
                'd' => 86_400_000,
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            total_millis = num
                .checked_mul(unit_millis)
                .and_then(|millis| total_millis.checked_add(millis))
                .ok_or_else(|| format!("Duration too large: {}", s.trim()))?;
            current_number.clear();
            has_value = true;
        }

        if !current_number.is_empty() {
            let num: u64 = current_number
                .parse()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_millis = num
                .checked_mul(1_000)
                .and_then(|millis| total_millis.checked_add(millis))
                .ok_or_else(|| format!("Duration too large: {}", s.trim()))?;
            has_value = true;
        }

        if !has_value {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_millis(total_millis)))
    }
}
