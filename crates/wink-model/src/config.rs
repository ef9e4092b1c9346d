//! Validation settings loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Settings controlling entity-level validation.
///
/// Values come from `WINK_*` environment variables, configuration files or
/// command-line flags, in OrthoConfig's usual precedence order. The email
/// format check is on unless `WINK_SKIP_EMAIL_FORMAT_CHECK` (or the
/// matching flag) turns it off, since an absent CLI flag reads as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WINK")]
pub struct ValidationSettings {
    /// Accept any textual email address during validation.
    #[ortho_config(default = false)]
    pub skip_email_format_check: bool,
}

impl ValidationSettings {
    /// Settings that accept any textual email address.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            skip_email_format_check: true,
        }
    }

    /// Whether validation checks the email address format.
    #[must_use]
    pub const fn check_email_format(&self) -> bool {
        !self.skip_email_format_check
    }
}
