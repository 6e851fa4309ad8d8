//! Configuration macros for zero-repetition config definitions
//!
//! The `config_struct!` macro defines a configuration structure with embedded
//! defaults in a single declaration.

/// Define a configuration struct with embedded defaults
///
/// Generates:
/// - The struct with public fields
/// - The Default implementation
/// - Serde support with `#[serde(default)]`, so missing keys take defaults
///
/// # Example
/// ```
/// cryptobar::config_struct! {
///     pub struct PanelConfig {
///         pinned: bool = false,
///         refresh_secs: u64 = 60,
///     }
/// }
///
/// assert_eq!(PanelConfig::default().refresh_secs, 60);
/// ```
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
