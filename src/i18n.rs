// ==========================================
// Internationalization (i18n)
// ==========================================
// rust-i18n, English (default) and Dutch
// The rust_i18n::i18n! macro is invoked in lib.rs
// ==========================================

/// Current locale
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Switch locale
///
/// # Arguments
/// - locale: "en" or "nl"
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// Translate a message without arguments
///
/// # Example
/// ```no_run
/// use recycling_planning::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Translate a message with `%{name}` placeholders
///
/// # Example
/// ```no_run
/// use recycling_planning::i18n::t_with_args;
/// let msg = t_with_args("fleet.plate_reserved", &[("plate", "NOT_ASSIGNED")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
