//region Index

/// Creates a strongly-typed identifier wrapper around an integer type.
///
/// # Example
/// ```
/// use odyssey_structures::define_index;
///
/// define_index!(NodeId, u32, "Unique identifier for a node");
///
/// let id = NodeId::from(42);
/// assert_eq!(*id, 42);
/// let raw: u32 = id.into();
/// assert_eq!(raw, 42);
/// ```
#[macro_export]
macro_rules! define_index {
    ($name:ident, $inner:ty, $doc:expr) => {
        #[doc = $doc]
        #[repr(transparent)]
        #[derive(
            Debug,
            Default,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            // const constructor
            pub const fn from(var: $inner) -> Self {
                Self(var)
            }

            // const return method
            pub const fn get(&self) -> $inner {
                self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = $inner;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                $name(value)
            }
        }

        impl From<$name> for $inner {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::OdysseyDataError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<$inner>().map($name).map_err(|e| {
                    $crate::OdysseyDataError::BadParameters(format!(
                        "'{}' is not a valid {}: {}",
                        s,
                        stringify!($name),
                        e
                    ))
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

//endregion
