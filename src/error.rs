use thiserror::Error;

/// Failure while bringing up or presenting to the window surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("no EGL display available")]
    NoDisplay,
    #[error("no EGL config matches the requested attributes")]
    NoConfig,
    #[error("{call} failed: {reason}")]
    Egl { call: &'static str, reason: String },
}

impl RenderError {
    pub fn egl(call: &'static str, reason: impl ToString) -> Self {
        RenderError::Egl {
            call,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("saved state is {found} bytes, expected {expected}")]
    Size { expected: usize, found: usize },
}

/// A JNI call into the host runtime that did not produce a usable value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("class `{0}` could not be resolved")]
    MissingClass(String),
    #[error("member `{member}` with signature `{signature}` not found")]
    MissingMember { member: String, signature: String },
    #[error("`{0}` returned null")]
    NullReference(String),
    #[error("java exception thrown by `{0}`")]
    JavaException(String),
    #[error("jni call `{call}` failed: {reason}")]
    Jni { call: String, reason: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmsError {
    #[error("intent carries no action")]
    MissingAction,
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
