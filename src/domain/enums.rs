//! Fixed enumerations shared by records, forms and reports.
//!
//! Values are stored in the database and rendered in reports by their
//! upper-case name (`ACTIVE`, `BANK_TRANSFER`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const NAMES: &'static [&'static str] = &[$($text),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(DomainError::Internal(format!(
                        "Unknown {} value: {}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

named_enum! {
    StudentStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        Graduated => "GRADUATED",
        Suspended => "SUSPENDED",
    }
}

named_enum! {
    EnrollmentStatus {
        Enrolled => "ENROLLED",
        Completed => "COMPLETED",
        Withdrawn => "WITHDRAWN",
        Failed => "FAILED",
    }
}

named_enum! {
    PaymentStatus {
        Pending => "PENDING",
        Paid => "PAID",
        Overdue => "OVERDUE",
        Refunded => "REFUNDED",
    }
}

named_enum! {
    PaymentMethod {
        Cash => "CASH",
        Card => "CARD",
        BankTransfer => "BANK_TRANSFER",
        Online => "ONLINE",
    }
}

named_enum! {
    InteractionType {
        Call => "CALL",
        Email => "EMAIL",
        Meeting => "MEETING",
        Sms => "SMS",
        Other => "OTHER",
    }
}

named_enum! {
    CourseLevel {
        Beginner => "BEGINNER",
        Intermediate => "INTERMEDIATE",
        Advanced => "ADVANCED",
    }
}

named_enum! {
    /// Role carried in the JWT and checked against the access table.
    UserRole {
        Admin => "ADMIN",
        Staff => "STAFF",
        Instructor => "INSTRUCTOR",
    }
}

/// Parse an optional stored column into its enum.
pub fn parse_optional<T: FromStr<Err = DomainError>>(
    value: Option<&str>,
) -> Result<Option<T>, DomainError> {
    value.map(str::parse).transpose()
}
