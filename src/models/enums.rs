use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(DeliveryStatus {
    Sent => "sent",
    Failed => "failed",
});

str_enum!(ResultFlag {
    Normal => "normal",
    Abnormal => "abnormal",
});

str_enum!(ArtifactKind {
    Pdf => "pdf",
    Html => "html",
});

impl DeliveryStatus {
    pub fn from_delivered(delivered: bool) -> Self {
        if delivered {
            Self::Sent
        } else {
            Self::Failed
        }
    }
}

impl ArtifactKind {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn delivery_status_round_trips_through_str() {
        for status in [DeliveryStatus::Sent, DeliveryStatus::Failed] {
            assert_eq!(DeliveryStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_value_is_invalid_enum() {
        let err = DeliveryStatus::from_str("queued").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { .. }));
    }

    #[test]
    fn delivered_maps_to_sent() {
        assert_eq!(DeliveryStatus::from_delivered(true), DeliveryStatus::Sent);
        assert_eq!(DeliveryStatus::from_delivered(false), DeliveryStatus::Failed);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ResultFlag::Abnormal).unwrap();
        assert_eq!(json, "\"abnormal\"");
    }
}
