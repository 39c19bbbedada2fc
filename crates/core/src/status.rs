//! Status enums for courses and enrollments.
//!
//! Each variant maps to the lowercase string stored in the database `status`
//! column (guarded by a CHECK constraint) and used on the wire.

use crate::error::CoreError;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $val)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The stored / wire representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }

            /// Parse the stored representation, rejecting anything else.
            pub fn parse(value: &str) -> Result<Self, CoreError> {
                match value {
                    $( $val => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Unknown {}: '{other}'. Valid values: {}",
                        stringify!($name),
                        [$($val),+].join(", ")
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }
    };
}

define_status_enum! {
    /// Whether a course is open for enrollment.
    CourseStatus {
        Active = "active",
        Inactive = "inactive",
    }
}

define_status_enum! {
    /// Enrollment lifecycle status. Transitions only happen via explicit
    /// update.
    EnrollmentStatus {
        Active = "active",
        Cancelled = "cancelled",
        Completed = "completed",
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn enrollment_status_round_trips_through_str() {
        for status in EnrollmentStatus::ALL {
            assert_eq!(EnrollmentStatus::parse(status.as_str()).unwrap(), *status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_matches!(
            EnrollmentStatus::parse("paused"),
            Err(CoreError::Validation(msg)) if msg.contains("active, cancelled, completed")
        );
        assert!(CourseStatus::parse("ACTIVE").is_err());
    }

    #[test]
    fn course_status_serializes_lowercase() {
        let json = serde_json::to_value(CourseStatus::Inactive).unwrap();
        assert_eq!(json, "inactive");
    }

    #[test]
    fn try_from_string_for_row_decoding() {
        let status: EnrollmentStatus = String::from("completed").try_into().unwrap();
        assert_eq!(status, EnrollmentStatus::Completed);
    }
}
