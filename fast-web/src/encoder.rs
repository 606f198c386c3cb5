//! Return-value shaping.
//!
//! A handler's output is broken into return slots by [`ReturnSlots`] and folded
//! into exactly one [`Envelope`] by [`ResponseEncoder`]:
//!
//! 1. No slots: success without data.
//! 2. Last slot is an error holding a value: `{500, <error text>}`, nothing else is read.
//! 3. Payload slot: the last slot, or the one before it when the last is the error slot.
//! 4. No payload slot: success without data.
//! 5. Payload is already an [`Envelope`]: sent unchanged.
//! 6. Otherwise: `{200, <success message>, data: payload}`.

use serde::Serialize;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::fmt::Display;

use crate::descriptor::ReturnShape;
use crate::envelope::{CODE_FAILURE, CODE_SUCCESS, Envelope};

/// One produced return value.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Serialized payload, or the serialization error text.
    Payload(Result<Value, String>),
    /// A handler-built envelope.
    Envelope(Envelope),
    /// The error slot; `None` when the call succeeded.
    Error(Option<String>),
}

impl Slot {
    /// Payload slot for `value`. An [`Envelope`] value becomes an envelope slot.
    pub fn payload<T: Serialize + 'static>(value: T) -> Self {
        let mut value = Some(value);
        if let Some(envelope) = (&mut value as &mut dyn Any)
            .downcast_mut::<Option<Envelope>>()
            .and_then(Option::take)
        {
            return Slot::Envelope(envelope);
        }
        Slot::Payload(serde_json::to_value(value).map_err(|e| e.to_string()))
    }

    /// Error slot for a failed call.
    pub fn error(err: impl Display) -> Self {
        Slot::Error(Some(err.to_string()))
    }
}

/// Marks a plain payload return.
///
/// ```rust,ignore
/// async fn version() -> Data<&'static str> {
///     Data(env!("CARGO_PKG_VERSION"))
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Data<T>(pub T);

/// Handler output that can be broken into return slots.
pub trait ReturnSlots: Send + 'static {
    /// Declared slot kinds.
    fn shapes() -> Vec<ReturnShape>;

    /// Produced slot values, same length and order as [`shapes`](Self::shapes).
    fn into_slots(self) -> Vec<Slot>;
}

impl ReturnSlots for () {
    fn shapes() -> Vec<ReturnShape> {
        Vec::new()
    }

    fn into_slots(self) -> Vec<Slot> {
        Vec::new()
    }
}

impl ReturnSlots for Envelope {
    fn shapes() -> Vec<ReturnShape> {
        vec![ReturnShape::Envelope]
    }

    fn into_slots(self) -> Vec<Slot> {
        vec![Slot::Envelope(self)]
    }
}

impl<T: Serialize + Send + 'static> ReturnSlots for Data<T> {
    fn shapes() -> Vec<ReturnShape> {
        vec![payload_shape::<T>()]
    }

    fn into_slots(self) -> Vec<Slot> {
        vec![Slot::payload(self.0)]
    }
}

impl ReturnSlots for String {
    fn shapes() -> Vec<ReturnShape> {
        vec![ReturnShape::Payload]
    }

    fn into_slots(self) -> Vec<Slot> {
        vec![Slot::Payload(Ok(Value::String(self)))]
    }
}

impl ReturnSlots for Value {
    fn shapes() -> Vec<ReturnShape> {
        vec![ReturnShape::Payload]
    }

    fn into_slots(self) -> Vec<Slot> {
        vec![Slot::Payload(Ok(self))]
    }
}

/// `Result<(), E>` has only the error slot; any other `T` adds a payload slot before it.
impl<T, E> ReturnSlots for Result<T, E>
where
    T: Serialize + Send + 'static,
    E: Display + Send + 'static,
{
    fn shapes() -> Vec<ReturnShape> {
        if is_unit::<T>() {
            vec![ReturnShape::Error]
        } else {
            vec![payload_shape::<T>(), ReturnShape::Error]
        }
    }

    fn into_slots(self) -> Vec<Slot> {
        let unit = is_unit::<T>();
        match self {
            Ok(_) if unit => vec![Slot::Error(None)],
            Ok(value) => vec![Slot::payload(value), Slot::Error(None)],
            Err(err) if unit => vec![Slot::error(err)],
            Err(err) => vec![Slot::Payload(Ok(Value::Null)), Slot::error(err)],
        }
    }
}

fn is_unit<T: 'static>() -> bool {
    TypeId::of::<T>() == TypeId::of::<()>()
}

fn payload_shape<T: 'static>() -> ReturnShape {
    if TypeId::of::<T>() == TypeId::of::<Envelope>() {
        ReturnShape::Envelope
    } else {
        ReturnShape::Payload
    }
}

/// Folds return slots into one envelope.
#[derive(Debug, Clone, Copy)]
pub struct ResponseEncoder<'a> {
    success_message: &'a str,
}

impl<'a> ResponseEncoder<'a> {
    /// Encoder using `success_message` for success envelopes.
    pub fn new(success_message: &'a str) -> Self {
        Self { success_message }
    }

    fn success(&self, data: Option<Value>) -> Envelope {
        Envelope {
            code: CODE_SUCCESS,
            message: self.success_message.to_string(),
            data,
        }
    }

    /// Apply the slot convention to `slots`.
    pub fn encode(&self, mut slots: Vec<Slot>) -> Envelope {
        let payload = match slots.pop() {
            None => return self.success(None),
            Some(Slot::Error(Some(message))) => return Envelope::error(CODE_FAILURE, message),
            Some(Slot::Error(None)) => slots.pop(),
            Some(slot) => Some(slot),
        };

        match payload {
            None | Some(Slot::Error(_)) => self.success(None),
            Some(Slot::Envelope(envelope)) => envelope,
            Some(Slot::Payload(Ok(Value::Null))) => self.success(None),
            Some(Slot::Payload(Ok(data))) => self.success(Some(data)),
            Some(Slot::Payload(Err(message))) => Envelope::error(CODE_FAILURE, message),
        }
    }
}
