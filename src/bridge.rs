//! Helpers shared by the JNI entry points.

use jni::errors::Error;
use jni::JNIEnv;
use log::warn;

use crate::error::BridgeError;

/// Attaches the name of the failing call or lookup to a `jni` error.
pub trait JniResultExt<T> {
    fn context(self, call: &str) -> Result<T, BridgeError>;

    /// Like [`context`](Self::context), reporting a thrown exception as a
    /// class that could not be found. Only for class lookups.
    fn class(self, name: &str) -> Result<T, BridgeError>;
}

impl<T> JniResultExt<T> for jni::errors::Result<T> {
    fn context(self, call: &str) -> Result<T, BridgeError> {
        self.map_err(|err| describe(err, call))
    }

    fn class(self, name: &str) -> Result<T, BridgeError> {
        self.map_err(|err| match describe(err, name) {
            BridgeError::JavaException(name) => BridgeError::MissingClass(name),
            other => other,
        })
    }
}

fn describe(err: Error, call: &str) -> BridgeError {
    match err {
        Error::MethodNotFound { name, sig } | Error::FieldNotFound { name, sig } => {
            BridgeError::MissingMember {
                member: name,
                signature: sig,
            }
        }
        Error::JavaException => BridgeError::JavaException(call.to_owned()),
        Error::NullPtr(_) | Error::NullDeref(_) => BridgeError::NullReference(call.to_owned()),
        other => BridgeError::Jni {
            call: call.to_owned(),
            reason: other.to_string(),
        },
    }
}

impl From<Error> for BridgeError {
    fn from(err: Error) -> Self {
        describe(err, "jni")
    }
}

/// A thread's JNI environment that may hold a thrown Java exception.
pub trait PendingException {
    /// Describes and clears a pending Java exception so that returning to
    /// the VM does not rethrow it.
    fn clear_pending_exception(&mut self);
}

impl PendingException for JNIEnv<'_> {
    fn clear_pending_exception(&mut self) {
        if !self.exception_check().unwrap_or(false) {
            return;
        }
        warn!("Clearing pending Java exception");
        if let Err(err) = self.exception_describe() {
            warn!("ExceptionDescribe failed: {err}");
        }
        if let Err(err) = self.exception_clear() {
            warn!("ExceptionClear failed: {err}");
        }
    }
}

/// Passes `result` through, clearing any pending exception first if it
/// failed.
pub fn cleared_on_error<E, T>(
    env: &mut E,
    result: Result<T, BridgeError>,
) -> Result<T, BridgeError>
where
    E: PendingException + ?Sized,
{
    if result.is_err() {
        env.clear_pending_exception();
    }
    result
}
