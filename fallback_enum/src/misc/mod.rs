#[allow(clippy::unwrap_used)]
pub mod test_utils {
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    pub fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Checks that `value` serializes to `expected` and that both an owned and a
    /// borrowed `expected` deserialize back to `value`.
    pub fn test_serde<T>(value: T, expected: Value)
    where
        T: for<'de> Deserialize<'de> + Serialize + std::fmt::Debug + PartialEq,
    {
        assert_eq!(serde_json::to_value(&value).unwrap(), expected);

        let owned = T::deserialize(expected.clone()).unwrap();
        assert_eq!(owned, value);

        let borrowed = T::deserialize(&expected).unwrap();
        assert_eq!(borrowed, value);
    }
}
