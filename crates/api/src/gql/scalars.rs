use async_graphql::{InputValueError, InputValueResult, Scalar, ScalarType, Value};

/// Spot count accepted from admin forms. Form submissions historically sent
/// this as either a number or a numeric string ("20"), so both parse; it is
/// always stored and returned as an integer.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct SpotCount(pub i32);

#[Scalar]
impl ScalarType for SpotCount {
    fn parse(value: Value) -> InputValueResult<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .and_then(|i| i32::try_from(i).ok())
                .map(SpotCount)
                .ok_or_else(|| InputValueError::custom("SpotCount expects a 32-bit integer")),
            Value::String(s) => s
                .trim()
                .parse::<i32>()
                .map(SpotCount)
                .map_err(|_| InputValueError::custom("SpotCount expects an integer or a numeric string")),
            _ => Err(InputValueError::custom(
                "SpotCount must be a number or a numeric string",
            )),
        }
    }

    fn to_value(&self) -> Value {
        Value::Number(self.0.into())
    }
}
