//! Archive, catalog and progress fixtures

use flate2::write::GzEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};
use std::io::{Cursor, Write};
use std::sync::Mutex;
use toolfetch_update::ProgressObserver;
use zip::write::SimpleFileOptions;

use super::constants::*;

/// Payload of the entry that `corrupt_zip` damages
pub const CORRUPTED_ENTRY: &str = "lib/payload.bin";
const CORRUPTED_PAYLOAD: &[u8] = b"payload that will be damaged on disk";

/// A jadx-like distribution wrapped in a single `jadx-1.5.0/` directory.
///
/// Entry points are stored without execute bits.
pub fn jadx_zip() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().unix_permissions(0o644);

    writer
        .add_directory(format!("{}/", WRAPPER_DIR), options)
        .unwrap();
    writer
        .add_directory(format!("{}/bin/", WRAPPER_DIR), options)
        .unwrap();
    for name in ["bin/jadx", "bin/jadx-gui"] {
        writer
            .start_file(format!("{}/{}", WRAPPER_DIR, name), options)
            .unwrap();
        writer.write_all(JADX_SCRIPT).unwrap();
    }
    writer
        .start_file(format!("{}/lib/jadx-1.5.0-all.jar", WRAPPER_DIR), options)
        .unwrap();
    writer.write_all(FAKE_BINARY_CONTENT).unwrap();
    writer
        .start_file(format!("{}/README.md", WRAPPER_DIR), options)
        .unwrap();
    writer.write_all(b"# jadx\n").unwrap();

    writer.finish().unwrap().into_inner()
}

/// A zip with files at the top level and no `bin/jadx-gui`
pub fn flat_zip_without_gui() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().unix_permissions(0o644);

    writer.start_file("bin/jadx", options).unwrap();
    writer.write_all(JADX_SCRIPT).unwrap();
    writer.start_file("LICENSE", options).unwrap();
    writer.write_all(b"Apache-2.0\n").unwrap();

    writer.finish().unwrap().into_inner()
}

/// A structurally valid zip whose `CORRUPTED_ENTRY` fails its CRC check
pub fn corrupt_zip() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    writer.start_file("README.md", stored).unwrap();
    writer.write_all(b"fine\n").unwrap();
    writer.start_file(CORRUPTED_ENTRY, stored).unwrap();
    writer.write_all(CORRUPTED_PAYLOAD).unwrap();

    let mut bytes = writer.finish().unwrap().into_inner();
    let offset = bytes
        .windows(CORRUPTED_PAYLOAD.len())
        .position(|w| w == CORRUPTED_PAYLOAD)
        .unwrap();
    bytes[offset] ^= 0xff;
    bytes
}

/// Lowercase hex SHA256 of `data`
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Published-style digest: `sha256:` followed by uppercase hex
pub fn published_digest(data: &[u8]) -> String {
    format!("sha256:{}", hex::encode_upper(Sha256::digest(data)))
}

/// Mirror catalog listing two JEB builds (times 100 and 200) plus noise
pub fn jeb_catalog_json() -> String {
    serde_json::json!({
        "name": "",
        "children": [
            {"name": "Tools", "children": [
                {"name": "Android_Tools", "children": [
                    {"name": JEB_OLD, "size": 11, "time": 100},
                    {"name": "apktool_2.9.3.jar", "size": 5, "time": 900},
                    {"name": JEB_NEW, "size": 22, "time": 200}
                ]},
                {"name": "Debuggers", "children": [
                    {"name": "x64dbg.zip", "size": 3, "time": 1000}
                ]}
            ]}
        ]
    })
    .to_string()
}

/// Wrap `json` in the mirror's JSONP callback
pub fn jsonp(json: &str) -> Vec<u8> {
    format!("{}({});\n", CALLBACK, json).into_bytes()
}

/// Gzip `data`
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Progress observer remembering every event
#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressObserver for RecordingProgress {
    fn start(&self, name: &str, total: Option<u64>) {
        self.events
            .lock()
            .unwrap()
            .push(format!("start {} {:?}", name, total));
    }

    fn advance(&self, bytes_written: u64) {
        self.events
            .lock()
            .unwrap()
            .push(format!("advance {}", bytes_written));
    }

    fn finish(&self, name: &str) {
        self.events.lock().unwrap().push(format!("finish {}", name));
    }
}
