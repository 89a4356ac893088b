//! Python snippets submitted to the cluster.
//!
//! Every caller-provided value is embedded as a JSON string literal, which is
//! also a valid Python string literal, so quotes and backslashes in mount
//! names or paths cannot break out of the script.

use serde_json::Value;

use super::SecretRef;

/// Directory under which all mounts are created.
pub const MOUNT_ROOT: &str = "/mnt";

/// Value of an entry in the `extra_configs` dictionary passed to
/// `dbutils.fs.mount`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigValue {
    /// Literal string value.
    Literal(String),
    /// Value fetched on the cluster through `dbutils.secrets.get`.
    Secret(SecretRef),
}

impl ConfigValue {
    fn render(&self) -> String {
        match self {
            Self::Literal(value) => py_str(value),
            Self::Secret(secret) => format!(
                "dbutils.secrets.get(scope = {}, key = {})",
                py_str(&secret.scope),
                py_str(&secret.key)
            ),
        }
    }
}

/// Renders `value` as a quoted Python string literal.
pub(crate) fn py_str(value: &str) -> String {
    Value::String(value.to_owned()).to_string()
}

/// Returns the absolute mount point for `mount_name`.
pub(crate) fn mount_point(mount_name: &str) -> String {
    format!("{MOUNT_ROOT}/{mount_name}")
}

/// Lists mounts and exits with the source of the one at `mount_name`, or with
/// empty text when there is none.
pub(crate) fn inspection(mount_name: &str) -> String {
    let point = py_str(&mount_point(mount_name));
    format!(
        "dbutils.fs.refreshMounts()\n\
         for mount in dbutils.fs.mounts():\n  \
           if mount.mountPoint == {point}:\n    \
             dbutils.notebook.exit(mount.source)\n\
         dbutils.notebook.exit(\"\")\n"
    )
}

/// Mounts `source` at `mount_name` unless it is already mounted there, then
/// exits with the source the cluster reports.
pub(crate) fn mount(mount_name: &str, source: &str, extra_configs: &[(String, ConfigValue)]) -> String {
    let point = py_str(&mount_point(mount_name));
    let source_literal = py_str(source);

    let entries: Vec<String> = extra_configs
        .iter()
        .map(|(key, value)| format!("\n  {}: {}", py_str(key), value.render()))
        .collect();
    let configs = if entries.is_empty() {
        String::from("{}")
    } else {
        format!("{{{}\n}}", entries.join(","))
    };

    format!(
        "mount_point = {point}\n\
         source = {source_literal}\n\
         extra_configs = {configs}\n\
         existing = [m.source for m in dbutils.fs.mounts() if m.mountPoint == mount_point]\n\
         if not existing:\n  \
           dbutils.fs.mount(source = source, mount_point = mount_point, extra_configs = extra_configs)\n  \
           dbutils.fs.refreshMounts()\n  \
           existing = [source]\n\
         dbutils.fs.ls(mount_point)\n\
         dbutils.notebook.exit(existing[0])\n"
    )
}

/// Removes the mount at `mount_name`.
pub(crate) fn unmount(mount_name: &str) -> String {
    let point = py_str(&mount_point(mount_name));
    format!("dbutils.fs.unmount({point})\ndbutils.fs.refreshMounts()\n")
}
