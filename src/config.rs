use std::env;
use std::str::FromStr;

use crate::error::AppError;
use crate::services::layout::LayoutWindow;
use crate::services::validator::ValidationRules;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub rules: ValidationRules,
    pub window: LayoutWindow,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://timetable.db".to_string(),
            rules: ValidationRules::default(),
            window: LayoutWindow::default(),
        }
    }
}

impl AppConfig {
    /// Reads `TIMETABLE_*` variables, falling back to defaults for any that are unset.
    pub fn new_from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let database_url = env::var("TIMETABLE_DATABASE_URL").unwrap_or(defaults.database_url);
        let email_domain =
            env::var("TIMETABLE_EMAIL_DOMAIN").unwrap_or(defaults.rules.email_domain);

        let window = LayoutWindow {
            start_hour: parse_var("TIMETABLE_WINDOW_START", defaults.window.start_hour)?,
            end_hour: parse_var("TIMETABLE_WINDOW_END", defaults.window.end_hour)?,
            hour_height: parse_var("TIMETABLE_HOUR_HEIGHT", defaults.window.hour_height)?,
        };
        check_window(&window)?;

        if email_domain.trim().is_empty() {
            return Err(AppError::Config("TIMETABLE_EMAIL_DOMAIN is empty".to_string()));
        }

        Ok(Self {
            database_url,
            rules: ValidationRules { email_domain },
            window,
        })
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} is not a valid number: {}", name, raw))),
        Err(_) => Ok(default),
    }
}

fn check_window(window: &LayoutWindow) -> Result<(), AppError> {
    if window.start_hour >= window.end_hour || window.end_hour > 24 {
        return Err(AppError::Config(format!(
            "display window {}-{} is not a valid hour range",
            window.start_hour, window.end_hour
        )));
    }
    if !(window.hour_height.is_finite() && window.hour_height > 0.0) {
        return Err(AppError::Config(format!(
            "hour height must be positive, got {}",
            window.hour_height
        )));
    }
    Ok(())
}
