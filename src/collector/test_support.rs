//! Shared fixtures for tests that run the converter.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

/// Shell stand-in for `terraform show -json`: honours `-chdir=` and prints the
/// artifact, which in tests already holds plan JSON.
const FAKE_CONVERTER: &str = r#"#!/bin/sh
dir=.
last=
for arg in "$@"; do
  case "$arg" in
    -chdir=*) dir="${arg#-chdir=}" ;;
  esac
  last="$arg"
done
case "$last" in
  /*) target="$last" ;;
  *) target="$dir/$last" ;;
esac
if [ ! -f "$target" ]; then
  echo "Error: plan file $target not found" >&2
  exit 1
fi
cat "$target"
"#;

static CONVERTER_DIR: OnceLock<TempDir> = OnceLock::new();

/// Path of the fake converter, written once per test binary.
///
/// A `sh` child writes the script: this process must never hold a write
/// descriptor on it, or children forked concurrently inherit one and exec
/// fails with `ETXTBSY`.
pub fn fake_converter() -> PathBuf {
    let dir = CONVERTER_DIR.get_or_init(|| {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("Failed to create converter dir");
        let path = dir.path().join("terraform");
        let status = std::process::Command::new("/bin/sh")
            .arg("-c")
            .arg(r#"printf '%s' "$1" > "$0""#)
            .arg(&path)
            .arg(FAKE_CONVERTER)
            .status()
            .expect("Failed to run sh");
        assert!(status.success(), "Failed to write fake converter");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake converter executable");
        dir
    });
    dir.path().join("terraform")
}

/// Renders plan JSON with one entry per `(type, name, actions)`, where
/// `actions` is comma separated (`"delete,create"`).
pub fn plan_json(changes: &[(&str, &str, &str)]) -> String {
    let entries: Vec<serde_json::Value> = changes
        .iter()
        .map(|(resource_type, name, actions)| {
            serde_json::json!({
                "address": format!("{resource_type}.{name}"),
                "type": resource_type,
                "name": name,
                "change": { "actions": actions.split(',').collect::<Vec<_>>() },
            })
        })
        .collect();

    serde_json::json!({
        "format_version": "1.2",
        "terraform_version": "1.7.5",
        "resource_changes": entries,
    })
    .to_string()
}

/// Writes a plan artifact at `root/relative` and returns its path.
pub fn write_plan(root: &Path, relative: &str, changes: &[(&str, &str, &str)]) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create plan dir");
    }
    std::fs::write(&path, plan_json(changes)).expect("Failed to write plan");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_converter_runs_while_others_spawn() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let artifact = write_plan(temp.path(), "plan.bin", &[("aws_vpc", "main", "create")]);

        let spawners: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    for _ in 0..20 {
                        let _ = std::process::Command::new("/bin/sh").arg("-c").arg("true").status();
                    }
                })
            })
            .collect();

        let output = std::process::Command::new(fake_converter())
            .arg(&artifact)
            .output()
            .expect("fake converter should run");

        for spawner in spawners {
            spawner.join().expect("spawner thread panicked");
        }

        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), plan_json(&[("aws_vpc", "main", "create")]));
    }
}
