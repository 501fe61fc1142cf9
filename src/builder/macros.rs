//! Macros for declaring state identifier enums.

/// Declare a state identifier enum with the full derive set required by
/// [`StateId`](crate::core::StateId).
///
/// # Example
///
/// ```
/// use tickstate::state_id;
///
/// state_id! {
///     pub enum EnemyId {
///         Spawning,
///         Moving,
///         Attacking,
///         Dead,
///     }
/// }
///
/// assert_ne!(EnemyId::Moving, EnemyId::Dead);
/// ```
#[macro_export]
macro_rules! state_id {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }
    };
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    state_id! {
        enum TestId {
            Idle,
            Busy,
        }
    }

    #[test]
    fn generated_enum_is_usable_as_a_key() {
        let mut map = HashMap::new();
        map.insert(TestId::Idle, 1);
        map.insert(TestId::Busy, 2);
        assert_eq!(map[&TestId::Busy], 2);
    }

    #[test]
    fn generated_enum_serializes() {
        let json = serde_json::to_string(&TestId::Idle).unwrap();
        assert_eq!(json, "\"Idle\"");
        let back: TestId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TestId::Idle);
    }
}
