//! Windows registry store backend, built on `winreg`.

use std::io::ErrorKind;

use winreg::enums::{
    HKEY_CLASSES_ROOT, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, HKEY_USERS, KEY_READ, KEY_SET_VALUE,
};
use winreg::RegKey;

use super::Store;
use crate::error::StoreError;
use crate::target::{Dword, RootScope, RuleTarget};

/// A [`Store`] backed by the live Windows registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryStore;

impl RegistryStore {
    /// Create a handle to the live registry.
    pub fn new() -> Self {
        Self
    }

    fn hive(scope: RootScope) -> RegKey {
        RegKey::predef(match scope {
            RootScope::CurrentUser => HKEY_CURRENT_USER,
            RootScope::LocalMachine => HKEY_LOCAL_MACHINE,
            RootScope::ClassesRoot => HKEY_CLASSES_ROOT,
            RootScope::Users => HKEY_USERS,
        })
    }
}

/// Win32 `ERROR_BAD_FILE_TYPE`, raised by winreg when a value is not the
/// requested registry type.
const ERROR_BAD_FILE_TYPE: i32 = 222;

fn classify(target: &RuleTarget, err: std::io::Error) -> StoreError {
    if err.raw_os_error() == Some(ERROR_BAD_FILE_TYPE) {
        return StoreError::TypeMismatch {
            target: target.clone(),
        };
    }
    match err.kind() {
        ErrorKind::NotFound => StoreError::NotFound {
            target: target.clone(),
        },
        ErrorKind::InvalidData => StoreError::TypeMismatch {
            target: target.clone(),
        },
        _ => StoreError::Access {
            target: target.clone(),
            source: err,
        },
    }
}

impl Store for RegistryStore {
    fn get_value(&self, target: &RuleTarget) -> Result<Dword, StoreError> {
        let key = Self::hive(target.scope())
            .open_subkey_with_flags(target.path(), KEY_READ)
            .map_err(|e| classify(target, e))?;
        key.get_value::<u32, _>(target.value_name())
            .map_err(|e| classify(target, e))
    }

    fn set_value(&self, target: &RuleTarget, value: Dword) -> Result<(), StoreError> {
        // create_subkey opens the key when it exists and creates every
        // missing segment otherwise.
        let (key, _) = Self::hive(target.scope())
            .create_subkey(target.path())
            .map_err(|source| StoreError::Access {
                target: target.clone(),
                source,
            })?;
        key.set_value(target.value_name(), &value)
            .map_err(|source| StoreError::Access {
                target: target.clone(),
                source,
            })
    }

    fn delete_value(&self, target: &RuleTarget) -> Result<(), StoreError> {
        let key = match Self::hive(target.scope())
            .open_subkey_with_flags(target.path(), KEY_SET_VALUE)
        {
            Ok(key) => key,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(StoreError::Access {
                    target: target.clone(),
                    source,
                })
            }
        };
        match key.delete_value(target.value_name()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Access {
                target: target.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> RuleTarget {
        RuleTarget::new(RootScope::CurrentUser, "App\\Security", "FeatureFlag").unwrap()
    }

    #[test]
    fn wrong_value_type_is_a_type_mismatch() {
        let err = classify(&target(), std::io::Error::from_raw_os_error(ERROR_BAD_FILE_TYPE));
        assert!(matches!(err, StoreError::TypeMismatch { .. }));
    }

    #[test]
    fn missing_value_is_not_found() {
        let err = classify(&target(), std::io::Error::from(ErrorKind::NotFound));
        assert!(err.is_not_found());
    }

    #[test]
    fn denied_access_is_an_access_error() {
        let err = classify(&target(), std::io::Error::from(ErrorKind::PermissionDenied));
        assert!(matches!(err, StoreError::Access { .. }));
    }
}
