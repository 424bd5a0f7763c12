use std::{
    env, io,
    path::{Path, PathBuf},
};

const HOST: &str = "127.0.0.1";
const PORT: u16 = 5001;
const MODEL_DIR: &str = "ml_model";
const MODEL_FILE: &str = "student_stress_model.json";

/// Immutable settings for a service instance.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    host: String,
    port: u16,
    model_path: PathBuf,
}

impl ServiceConfig {
    /// Creates a new service configuration.
    ///
    /// # Args
    /// * `host` - Interface to listen on.
    /// * `port` - Port to listen on.
    /// * `model_path` - Location of the model artifact.
    ///
    /// # Returns
    /// A `ServiceConfig` instance.
    pub fn new(host: impl Into<String>, port: u16, model_path: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            port,
            model_path: model_path.into(),
        }
    }

    /// Returns the `host:port` address to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the path the model artifact is loaded from.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// The fixed deployment settings.
    ///
    /// The artifact is `ml_model/student_stress_model.json` next to the
    /// executable; when that file is absent, the copy under the crate sources is
    /// used so `cargo run` works from a checkout.
    ///
    /// # Errors
    /// Returns an io error if the executable's location can't be determined.
    pub fn locate() -> io::Result<Self> {
        let exe = env::current_exe()?;
        let exe_dir = exe
            .parent()
            .ok_or_else(|| io::Error::other("executable has no parent directory"))?;
        let source_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

        Ok(Self::new(HOST, PORT, model_path_in(exe_dir, source_dir)))
    }
}

/// Picks the artifact under `exe_dir`, else under `source_dir`, else the
/// `exe_dir` path so the load failure names the deployed location.
fn model_path_in(exe_dir: &Path, source_dir: &Path) -> PathBuf {
    let deployed = exe_dir.join(MODEL_DIR).join(MODEL_FILE);
    if deployed.is_file() {
        return deployed;
    }

    let checkout = source_dir.join(MODEL_DIR).join(MODEL_FILE);
    if checkout.is_file() {
        checkout
    } else {
        deployed
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn place_artifact(dir: &Path) -> PathBuf {
        let path = dir.join(MODEL_DIR).join(MODEL_FILE);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{}").unwrap();
        path
    }

    #[test]
    fn located_config_listens_on_fixed_port() {
        let config = ServiceConfig::locate().unwrap();

        assert_eq!(config.port(), 5001);
        assert_eq!(config.bind_addr(), "127.0.0.1:5001");
        assert!(config.model_path().is_absolute());
        assert!(config.model_path().ends_with("ml_model/student_stress_model.json"));
    }

    #[test]
    fn artifact_next_to_executable_wins() {
        let exe_dir = tempfile::tempdir().unwrap();
        let source_dir = tempfile::tempdir().unwrap();
        let deployed = place_artifact(exe_dir.path());
        place_artifact(source_dir.path());

        assert_eq!(model_path_in(exe_dir.path(), source_dir.path()), deployed);
    }

    #[test]
    fn checkout_artifact_is_used_when_none_is_deployed() {
        let exe_dir = tempfile::tempdir().unwrap();
        let source_dir = tempfile::tempdir().unwrap();
        let checkout = place_artifact(source_dir.path());

        assert_eq!(model_path_in(exe_dir.path(), source_dir.path()), checkout);
    }

    #[test]
    fn missing_artifact_points_next_to_executable() {
        let exe_dir = tempfile::tempdir().unwrap();
        let source_dir = tempfile::tempdir().unwrap();

        assert_eq!(
            model_path_in(exe_dir.path(), source_dir.path()),
            exe_dir.path().join("ml_model").join("student_stress_model.json")
        );
    }
}
