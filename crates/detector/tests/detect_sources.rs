use mapping_detector::{CallSiteDetector, DetectorConfig};
use mapping_protocol::{CallSource, HttpMethod};
use mapping_registry::{EndpointRegistry, DEFAULT_REGISTRY_NAME};
use mapping_scanner::{load_sources, FileScanner};
use std::fs;
use tempfile::TempDir;

#[test]
fn detects_calls_across_scanned_tree() {
    let temp = TempDir::new().expect("tempdir");
    let src = temp.path().join("src");
    fs::create_dir_all(src.join("pages")).unwrap();
    fs::write(
        src.join("pages/Rescisao.tsx"),
        r#"
import { api } from '../config/api';
import { ENDPOINTS } from '../config/api';

export async function calcular(form) {
  const { data } = await api.post(ENDPOINTS.calculadoras.rescisao, form);
  return data;
}

export const listar = () => api.get(ENDPOINTS.calculadoras.rescisao);
"#,
    )
    .unwrap();
    fs::write(
        src.join("pages/Health.jsx"),
        "export const ping = () => axios.get('/health/');\n",
    )
    .unwrap();

    let registry = EndpointRegistry::parse(
        "export const ENDPOINTS = { calculadoras: { rescisao: '/api/v1/rescisao' } };",
        DEFAULT_REGISTRY_NAME,
    )
    .expect("registry");
    let detector = CallSiteDetector::new(&registry, &DetectorConfig::default()).expect("detector");

    let sources = load_sources(&FileScanner::new(&src).scan());
    let calls = detector.detect(&sources, temp.path());

    assert_eq!(calls.len(), 3, "{calls:?}");

    assert_eq!(calls[0].file, "src/pages/Health.jsx");
    assert_eq!(calls[0].method, HttpMethod::Get);
    assert_eq!(calls[0].path, "/health/");
    assert_eq!(calls[0].key_path, None);
    assert_eq!(calls[0].source, CallSource::Literal);

    let methods: Vec<HttpMethod> = calls[1..].iter().map(|c| c.method).collect();
    assert_eq!(methods, vec![HttpMethod::Post, HttpMethod::Get]);
    assert!(calls[1..].iter().all(|c| {
        c.file == "src/pages/Rescisao.tsx"
            && c.key_path.as_deref() == Some("calculadoras.rescisao")
            && c.path == "/api/v1/rescisao"
            && c.source == CallSource::Endpoints
    }));
}
