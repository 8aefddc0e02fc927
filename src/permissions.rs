//! Runtime permission checks for the SMS permissions.

use log::info;

use crate::error::BridgeError;

/// `android.Manifest.permission` fields this app needs.
pub const SMS_PERMISSIONS: [&str; 2] = ["READ_SMS", "RECEIVE_SMS"];

/// Access to the activity's permission API.
pub trait PermissionHost {
    fn has_permission(&mut self, name: &str) -> Result<bool, BridgeError>;

    /// Asks for every permission in `names` with one system dialog. The user's
    /// answer is not reported back.
    fn request_permissions(&mut self, names: &[&str]) -> Result<(), BridgeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionCheck {
    AlreadyGranted,
    Requested,
}

/// Requests all of `names` at once unless every one is already granted.
pub fn check_permissions<H: PermissionHost>(
    host: &mut H,
    names: &[&str],
) -> Result<PermissionCheck, BridgeError> {
    for name in names {
        if !host.has_permission(name)? {
            info!("{name} not granted, requesting {names:?}");
            host.request_permissions(names)?;
            return Ok(PermissionCheck::Requested);
        }
    }
    Ok(PermissionCheck::AlreadyGranted)
}

#[cfg(target_os = "android")]
pub use self::android::ActivityPermissions;

#[cfg(target_os = "android")]
mod android {
    use jni::objects::{JObject, JValue};
    use jni::{JNIEnv, JavaVM};

    use super::PermissionHost;
    use crate::bridge::{cleared_on_error, JniResultExt};
    use crate::error::BridgeError;

    const MANIFEST_PERMISSION: &str = "android/Manifest$permission";
    const PACKAGE_MANAGER: &str = "android/content/pm/PackageManager";

    /// Permission calls against the `NativeActivity` published by the glue.
    pub struct ActivityPermissions {
        vm: JavaVM,
        activity: jni::sys::jobject,
    }

    impl ActivityPermissions {
        pub fn from_context() -> Result<Self, BridgeError> {
            let context = ndk_context::android_context();
            let vm = unsafe { JavaVM::from_raw(context.vm().cast()) }.context("JavaVM")?;
            Ok(ActivityPermissions {
                vm,
                activity: context.context().cast(),
            })
        }
    }

    fn permission_name<'local>(
        env: &mut JNIEnv<'local>,
        name: &str,
    ) -> Result<JObject<'local>, BridgeError> {
        let value = env
            .get_static_field(MANIFEST_PERMISSION, name, "Ljava/lang/String;")
            .context(name)?
            .l()
            .context(name)?;
        if value.is_null() {
            return Err(BridgeError::NullReference(format!("Manifest.permission.{name}")));
        }
        Ok(value)
    }

    fn has_permission(
        env: &mut JNIEnv,
        activity: &JObject,
        name: &str,
    ) -> Result<bool, BridgeError> {
        let permission = permission_name(env, name)?;
        let granted = env
            .get_static_field(PACKAGE_MANAGER, "PERMISSION_GRANTED", "I")
            .context("PERMISSION_GRANTED")?
            .i()
            .context("PERMISSION_GRANTED")?;
        let status = env
            .call_method(
                activity,
                "checkSelfPermission",
                "(Ljava/lang/String;)I",
                &[JValue::Object(&permission)],
            )
            .context("checkSelfPermission")?
            .i()
            .context("checkSelfPermission")?;
        Ok(status == granted)
    }

    fn request_permissions(
        env: &mut JNIEnv,
        activity: &JObject,
        names: &[&str],
    ) -> Result<(), BridgeError> {
        let len = i32::try_from(names.len()).map_err(|_| BridgeError::Jni {
            call: "NewObjectArray".into(),
            reason: format!("{} permissions", names.len()),
        })?;
        let array = env
            .new_object_array(len, "java/lang/String", JObject::null())
            .context("NewObjectArray")?;
        for (index, name) in (0..len).zip(names) {
            let permission = permission_name(env, name)?;
            env.set_object_array_element(&array, index, &permission)
                .context("SetObjectArrayElement")?;
        }
        env.call_method(
            activity,
            "requestPermissions",
            "([Ljava/lang/String;I)V",
            &[JValue::Object(&array), JValue::Int(0)],
        )
        .context("requestPermissions")?;
        Ok(())
    }

    impl PermissionHost for ActivityPermissions {
        fn has_permission(&mut self, name: &str) -> Result<bool, BridgeError> {
            let mut env = self.vm.attach_current_thread().context("AttachCurrentThread")?;
            let activity = unsafe { JObject::from_raw(self.activity) };
            let result = has_permission(&mut env, &activity, name);
            cleared_on_error(&mut *env, result)
        }

        fn request_permissions(&mut self, names: &[&str]) -> Result<(), BridgeError> {
            let mut env = self.vm.attach_current_thread().context("AttachCurrentThread")?;
            let activity = unsafe { JObject::from_raw(self.activity) };
            let result = request_permissions(&mut env, &activity, names);
            cleared_on_error(&mut *env, result)
        }
    }
}
