//! Storage models, one per table

/// A stored code that does not name any known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: '{value}'")]
pub struct ParseCodeError {
    /// Name of the code list
    pub kind: &'static str,
    /// The rejected value
    pub value: String,
}

/// Declares a closed list of codes that is stored as lower-case text
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$vmeta:meta])* $variant:ident => $code:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// The stored code
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $code ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::ParseCodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $( $code => Ok($name::$variant), )+
                    _ => Err($crate::models::ParseCodeError {
                        kind: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::models::ParseCodeError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub mod education;
pub mod health;
pub mod profile;
pub mod user;

pub use education::{EducationRecord, EnrollmentStatus, ProgramType};
pub use health::{ChildRecord, HealthRecord, PregnancyStatus, Sex, VisitRecord, VisitType};
pub use profile::{Address, Partner, Profile};
pub use user::{Role, User};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_parse_case_insensitively() {
        assert_eq!("Prenatal".parse::<VisitType>().unwrap(), VisitType::Prenatal);
        assert_eq!(" DROPPED_OUT ".parse::<EnrollmentStatus>().unwrap(), EnrollmentStatus::DroppedOut);
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        let err = "midwife".parse::<Role>().unwrap_err();
        assert_eq!(err.kind, "Role");
        assert!(err.to_string().contains("midwife"));
    }

    #[test]
    fn test_serde_matches_stored_code() {
        for status in EnrollmentStatus::ALL {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }
}
