//! Forwarding of received SMS broadcasts.
//!
//! The Java receiver `com.SmsHandlerNative.SmsListener` passes every broadcast
//! intent to `Java_com_SmsHandlerNative_SmsListener_onReceived`. The intent
//! is read through an [`SmsSource`] and each message is handed to an
//! [`SmsHandler`].

use log::debug;

use crate::error::SmsError;

pub const SMS_RECEIVED_ACTION: &str = "android.provider.Telephony.SMS_RECEIVED";

/// How an intent's action is compared with [`SMS_RECEIVED_ACTION`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ActionMatch {
    #[default]
    Exact,
    /// Compares only as many characters as the received action has, so any
    /// prefix of the expected action (the empty string included) matches.
    /// Older builds of the receiver behaved this way.
    LegacyPrefix,
}

impl ActionMatch {
    pub fn matches(self, received: &str) -> bool {
        match self {
            ActionMatch::Exact => received == SMS_RECEIVED_ACTION,
            ActionMatch::LegacyPrefix => SMS_RECEIVED_ACTION.starts_with(received),
        }
    }
}

/// One PDU of a received broadcast. Either field is `None` when the platform
/// returned null for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMessage {
    pub body: Option<String>,
    pub address: Option<String>,
}

/// What a handler receives. `timestamp` and `state` are not read from the
/// message and are always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingSms {
    pub body: Option<String>,
    pub address: Option<String>,
    pub timestamp: i64,
    pub state: i32,
}

/// A received broadcast intent.
pub trait SmsSource {
    fn action(&mut self) -> Result<Option<String>, SmsError>;
    fn messages(&mut self) -> Result<Vec<SmsMessage>, SmsError>;
}

pub trait SmsHandler {
    fn process_incoming(&mut self, sms: IncomingSms);
}

/// Accepts every message and only logs it.
#[derive(Debug, Default)]
pub struct LoggingHandler;

impl SmsHandler for LoggingHandler {
    fn process_incoming(&mut self, sms: IncomingSms) {
        debug!(
            "SMS from {}, {} chars",
            sms.address.as_deref().unwrap_or("<unknown>"),
            sms.body.as_deref().map_or(0, |body| body.chars().count())
        );
    }
}

/// Forwards every message of an SMS-received intent to `handler`.
///
/// Returns how many messages were forwarded; intents with another action
/// forward nothing.
pub fn deliver<S, H>(
    source: &mut S,
    handler: &mut H,
    policy: ActionMatch,
) -> Result<usize, SmsError>
where
    S: SmsSource + ?Sized,
    H: SmsHandler + ?Sized,
{
    let action = source.action()?.ok_or(SmsError::MissingAction)?;
    if !policy.matches(&action) {
        debug!("Ignoring intent with action {action:?}");
        return Ok(0);
    }
    let messages = source.messages()?;
    let count = messages.len();
    for message in messages {
        handler.process_incoming(IncomingSms {
            body: message.body,
            address: message.address,
            timestamp: 0,
            state: 0,
        });
    }
    Ok(count)
}

#[cfg(target_os = "android")]
pub use self::android::{
    IntentSource, JNI_OnLoad, Java_com_SmsHandlerNative_SmsListener_onReceived,
};

#[cfg(target_os = "android")]
mod android {
    use std::ffi::c_void;

    use jni::objects::{JObject, JObjectArray, JString, JValue};
    use jni::sys::{jint, JNI_VERSION_1_6};
    use jni::{JNIEnv, JavaVM};
    use log::{debug, error, warn};

    use super::{deliver, LoggingHandler, SmsMessage, SmsSource};
    use crate::bridge::{JniResultExt, PendingException};
    use crate::config::{init_logging, AppConfig};
    use crate::error::{BridgeError, SmsError};

    const LISTENER_CLASS: &str = "com/SmsHandlerNative/SmsListener";
    const SMS_INTENTS_CLASS: &str = "android/provider/Telephony$Sms$Intents";

    /// Reads an `android.content.Intent` through JNI.
    pub struct IntentSource<'a, 'local> {
        env: &'a mut JNIEnv<'local>,
        intent: &'a JObject<'local>,
    }

    impl<'a, 'local> IntentSource<'a, 'local> {
        pub fn new(env: &'a mut JNIEnv<'local>, intent: &'a JObject<'local>) -> Self {
            IntentSource { env, intent }
        }
    }

    fn string_method(
        env: &mut JNIEnv,
        object: &JObject,
        method: &str,
    ) -> Result<Option<String>, BridgeError> {
        let value = env
            .call_method(object, method, "()Ljava/lang/String;", &[])
            .context(method)?
            .l()
            .context(method)?;
        if value.is_null() {
            return Ok(None);
        }
        let value = JString::from(value);
        let text = env.get_string(&value).context(method)?.into();
        Ok(Some(text))
    }

    impl SmsSource for IntentSource<'_, '_> {
        fn action(&mut self) -> Result<Option<String>, SmsError> {
            Ok(string_method(self.env, self.intent, "getAction")?)
        }

        fn messages(&mut self) -> Result<Vec<SmsMessage>, SmsError> {
            let class = self
                .env
                .find_class(SMS_INTENTS_CLASS)
                .class(SMS_INTENTS_CLASS)?;
            let messages = self
                .env
                .call_static_method(
                    &class,
                    "getMessagesFromIntent",
                    "(Landroid/content/Intent;)[Landroid/telephony/SmsMessage;",
                    &[JValue::Object(self.intent)],
                )
                .context("getMessagesFromIntent")?
                .l()
                .context("getMessagesFromIntent")?;
            self.env.delete_local_ref(class).context("DeleteLocalRef")?;
            if messages.is_null() {
                return Err(BridgeError::NullReference("getMessagesFromIntent".into()).into());
            }
            let messages = JObjectArray::from(messages);
            let len = self
                .env
                .get_array_length(&messages)
                .context("GetArrayLength")?;
            let mut out = Vec::with_capacity(len.max(0) as usize);
            for index in 0..len {
                let message = self.env.with_local_frame(4, |env| {
                    let sms = env
                        .get_object_array_element(&messages, index)
                        .context("GetObjectArrayElement")?;
                    Ok::<_, BridgeError>(SmsMessage {
                        body: string_method(env, &sms, "getMessageBody")?,
                        address: string_method(env, &sms, "getOriginatingAddress")?,
                    })
                })?;
                out.push(message);
            }
            self.env.delete_local_ref(messages).context("DeleteLocalRef")?;
            Ok(out)
        }
    }

    /// Called by `SmsListener.onReceived(Intent)` for every SMS broadcast.
    #[no_mangle]
    pub extern "system" fn Java_com_SmsHandlerNative_SmsListener_onReceived<'local>(
        mut env: JNIEnv<'local>,
        _this: JObject<'local>,
        intent: JObject<'local>,
    ) {
        let config = AppConfig::DEFAULT;
        let result = {
            let mut source = IntentSource::new(&mut env, &intent);
            deliver(&mut source, &mut LoggingHandler, config.sms_action_match)
        };
        match result {
            Ok(count) => debug!("Forwarded {count} SMS messages"),
            Err(err) => error!("Unable to read SMS intent: {err}"),
        }
        env.clear_pending_exception();
    }

    #[no_mangle]
    pub extern "system" fn JNI_OnLoad(vm: JavaVM, _reserved: *mut c_void) -> jint {
        init_logging(&AppConfig::DEFAULT);
        match vm.get_env() {
            Ok(mut env) => {
                if let Err(err) = env.find_class(LISTENER_CLASS).class(LISTENER_CLASS) {
                    warn!("{err}");
                    env.clear_pending_exception();
                }
            }
            Err(err) => warn!("No JNI environment on load: {err}"),
        }
        JNI_VERSION_1_6
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;

    struct FakeIntent {
        action: Option<&'static str>,
        messages: Vec<SmsMessage>,
        read: bool,
    }

    impl FakeIntent {
        fn new(action: &'static str, messages: Vec<SmsMessage>) -> Self {
            FakeIntent {
                action: Some(action),
                messages,
                read: false,
            }
        }
    }

    impl SmsSource for FakeIntent {
        fn action(&mut self) -> Result<Option<String>, SmsError> {
            Ok(self.action.map(str::to_owned))
        }

        fn messages(&mut self) -> Result<Vec<SmsMessage>, SmsError> {
            self.read = true;
            Ok(self.messages.clone())
        }
    }

    struct BrokenIntent;

    impl SmsSource for BrokenIntent {
        fn action(&mut self) -> Result<Option<String>, SmsError> {
            Ok(Some(SMS_RECEIVED_ACTION.to_owned()))
        }

        fn messages(&mut self) -> Result<Vec<SmsMessage>, SmsError> {
            Err(BridgeError::MissingClass("android/provider/Telephony$Sms$Intents".into()).into())
        }
    }

    #[derive(Default)]
    struct Inbox(Vec<IncomingSms>);

    impl SmsHandler for Inbox {
        fn process_incoming(&mut self, sms: IncomingSms) {
            self.0.push(sms);
        }
    }

    fn message(body: &str, address: &str) -> SmsMessage {
        SmsMessage {
            body: Some(body.to_owned()),
            address: Some(address.to_owned()),
        }
    }

    #[test]
    fn exact_match_requires_the_full_action() {
        assert!(ActionMatch::Exact.matches(SMS_RECEIVED_ACTION));
        assert!(!ActionMatch::Exact.matches("android.provider.Telephony"));
        assert!(!ActionMatch::Exact.matches(""));
    }

    #[test]
    fn legacy_match_accepts_strict_prefixes() {
        assert!(ActionMatch::LegacyPrefix.matches(SMS_RECEIVED_ACTION));
        assert!(ActionMatch::LegacyPrefix.matches("android.provider.Telephony"));
        assert!(ActionMatch::LegacyPrefix.matches(""));
        assert!(!ActionMatch::LegacyPrefix.matches("android.provider.Telephony.SMS_RECEIVED_X"));
        assert!(!ActionMatch::LegacyPrefix.matches("android.intent.action.BOOT_COMPLETED"));
    }

    #[test]
    fn every_message_is_forwarded_with_zero_timestamp() {
        let mut intent = FakeIntent::new(
            SMS_RECEIVED_ACTION,
            vec![message("hello", "+15550100"), message("again", "+15550101")],
        );
        let mut inbox = Inbox::default();
        assert_eq!(deliver(&mut intent, &mut inbox, ActionMatch::Exact), Ok(2));
        assert_eq!(
            inbox.0[1],
            IncomingSms {
                body: Some("again".into()),
                address: Some("+15550101".into()),
                timestamp: 0,
                state: 0,
            }
        );
    }

    #[test]
    fn other_actions_forward_nothing() {
        let mut intent = FakeIntent::new("android.provider.Telephony", vec![message("x", "y")]);
        let mut inbox = Inbox::default();
        assert_eq!(deliver(&mut intent, &mut inbox, ActionMatch::Exact), Ok(0));
        assert!(inbox.0.is_empty());
        assert!(!intent.read);
    }

    #[test]
    fn legacy_policy_forwards_prefix_actions() {
        let mut intent = FakeIntent::new("android.provider.Telephony", vec![message("x", "y")]);
        let mut inbox = Inbox::default();
        assert_eq!(deliver(&mut intent, &mut inbox, ActionMatch::LegacyPrefix), Ok(1));
    }

    #[test]
    fn missing_action_is_an_error() {
        let mut intent = FakeIntent {
            action: None,
            messages: Vec::new(),
            read: false,
        };
        assert_eq!(
            deliver(&mut intent, &mut LoggingHandler, ActionMatch::Exact),
            Err(SmsError::MissingAction)
        );
    }

    #[test]
    fn bridge_failures_propagate() {
        let mut inbox = Inbox::default();
        let err = deliver(&mut BrokenIntent, &mut inbox, ActionMatch::Exact).unwrap_err();
        assert!(matches!(err, SmsError::Bridge(BridgeError::MissingClass(_))));
        assert!(inbox.0.is_empty());
    }

    #[test]
    fn null_fields_pass_through() {
        let mut intent = FakeIntent::new(
            SMS_RECEIVED_ACTION,
            vec![SmsMessage {
                body: None,
                address: None,
            }],
        );
        let mut inbox = Inbox::default();
        deliver(&mut intent, &mut inbox, ActionMatch::Exact).unwrap();
        assert_eq!(inbox.0[0].body, None);
    }
}
