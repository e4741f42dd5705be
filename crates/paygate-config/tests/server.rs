use std::io::Write;
use std::path::Path;

use paygate_canonical::{CanonicalEngine, CompactionPolicy};
use paygate_config::{
    Backend, BackendFactory, BackendRegistry, ConfigError, ConfigMerchantDirectory, ConfigServer,
    PolicyConfig,
};
use paygate_core::{
    AppId, AuthError, MerchantDirectory, PayOrder, RequestAuthenticator, SignType, Signer,
    SigningKey,
};
use tempfile::TempDir;

const CONFIG: &str = r#"
merchants:
  m1001:
    sign_type: MD5
    md5_key: md5-secret
  m1002:
    app_id: m1002
    sign_type: 42
policy:
  exclude: [sign_type]
  sort_keys: true
"#;

fn write_config(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

fn file_url(path: &Path) -> String {
    url::Url::from_file_path(path).unwrap().to_string()
}

fn make_server(dir: &TempDir) -> ConfigServer {
    let path = write_config(dir, "paygate.yaml", CONFIG);
    ConfigServer::init(&file_url(&path), &BackendRegistry::with_defaults()).unwrap()
}

#[test]
fn test_unmarshal_typed_policy() {
    let dir = TempDir::new().unwrap();
    let server = make_server(&dir);
    let config: PolicyConfig = server.unmarshal_get_config(&["policy"]).unwrap();
    assert_eq!(config.sign_field, "sign");
    assert_eq!(config.exclude, vec!["sign_type".to_string()]);

    let policy: CompactionPolicy = config.into();
    let order = PayOrder {
        version: "1.0".into(),
        sign_type: "MD5".into(),
        sign: "x".into(),
        ..Default::default()
    };
    let s = CanonicalEngine::standard()
        .canonicalize(&order, "json", policy)
        .unwrap();
    assert_eq!(s, "version=1.0");
}

#[test]
fn test_missing_and_invalid_keys() {
    let dir = TempDir::new().unwrap();
    let server = make_server(&dir);
    assert!(matches!(
        server.unmarshal_get_config::<PolicyConfig>(&["nope"]),
        Err(ConfigError::NotFound(k)) if k == "nope"
    ));
    assert!(matches!(
        server.unmarshal_get_config::<paygate_core::MerchantConfig>(&["merchants", "m1002"]),
        Err(ConfigError::Invalid { .. })
    ));
}

#[test]
fn test_directory_authenticates_against_file_config() {
    let dir = TempDir::new().unwrap();
    let directory = ConfigMerchantDirectory::new(make_server(&dir));

    let merchant = directory.merchant(&AppId::parse("m1001").unwrap()).unwrap();
    assert_eq!(merchant.app_id, "m1001");
    assert_eq!(merchant.sign_type, SignType::Md5);
    assert_eq!(
        directory.merchant(&AppId::parse("m9").unwrap()).unwrap_err(),
        AuthError::UnknownMerchant("m9".into())
    );
    assert!(matches!(
        directory.merchant(&AppId::parse("m1002").unwrap()),
        Err(AuthError::Directory(_))
    ));

    let engine = CanonicalEngine::standard();
    let mut order = PayOrder {
        version: "1.0".into(),
        out_trade_no: "T1".into(),
        pay_amount: 100,
        app_id: "m1001".into(),
        ..Default::default()
    };
    let signer = Signer::new(
        PayOrder::signing_compactor(&engine).unwrap(),
        SigningKey::parse(SignType::Md5, "md5-secret").unwrap(),
    );
    order.sign = signer.sign(&order).unwrap();

    let auth = RequestAuthenticator::new(directory, &engine).unwrap();
    assert!(auth.authenticate(&order).is_ok());
}

#[test]
fn test_init_failures() {
    let registry = BackendRegistry::with_defaults();
    assert!(matches!(
        ConfigServer::init("not a url", &registry),
        Err(ConfigError::InvalidUrl(_))
    ));
    assert!(matches!(
        ConfigServer::init("etcd://localhost:2379/paygate", &registry),
        Err(ConfigError::UnknownBackend { .. })
    ));

    let err = ConfigServer::init("file:///etc/paygate/config.toml", &registry).unwrap_err();
    assert!(err.to_string().contains("file:///etc/paygate/config.yaml"));

    let dir = TempDir::new().unwrap();
    let url = file_url(&dir.path().join("absent.json"));
    assert!(matches!(
        ConfigServer::init(&url, &registry),
        Err(ConfigError::Io(_))
    ));
}

struct StaticBackend(serde_json::Value);

impl Backend for StaticBackend {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    fn start(&mut self) -> Result<(), ConfigError> {
        Ok(())
    }

    fn get_value(&self, keys: &[&str]) -> Result<serde_json::Value, ConfigError> {
        paygate_config::backend::lookup(&self.0, keys).cloned()
    }
}

#[test]
fn test_custom_backend_registration() {
    let mut registry = BackendRegistry::new();
    registry.register(
        "static",
        BackendFactory {
            init: |_| {
                let backend = StaticBackend(serde_json::json!({"policy": {"skip_empty": false}}));
                Ok(Box::new(backend) as Box<dyn Backend>)
            },
            demo_url: "static://",
        },
    );
    let server = ConfigServer::init("static://anything", &registry).unwrap();
    let config: PolicyConfig = server.unmarshal_get_config(&["policy"]).unwrap();
    assert!(!config.skip_empty);
    assert!(config.sort_keys);
}
