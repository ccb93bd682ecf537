//! Shared constants for test infrastructure

// Release tags
pub const TAG_V1_4_7: &str = "v1.4.7";
pub const TAG_V1_5_0: &str = "v1.5.0";

// Asset names
pub const JADX_ASSET: &str = "jadx-1.5.0.zip";
pub const JADX_GUI_ASSET: &str = "jadx-gui-1.5.0-with-jre-win.zip";
pub const WRAPPER_DIR: &str = "jadx-1.5.0";

// Mock server paths
pub const LATEST_RELEASE_PATH: &str = "/repos/skylot/jadx/releases/latest";
pub const CATALOG_PATH: &str = "/list.js";

// Mirror catalog
pub const CALLBACK: &str = "__jsonpCallbackDown52PojieCn";
pub const JEB_PATTERN: &str = r"/Tools/Android_Tools/JEB_demo_([\d.]+)_by_CXV";
pub const JEB_OLD: &str = "JEB_demo_4.1_by_CXV.7z";
pub const JEB_NEW: &str = "JEB_demo_5.2_by_CXV.7z";

// Payloads
pub const FAKE_BINARY_CONTENT: &[u8] = b"fake binary content for testing";
pub const JADX_SCRIPT: &[u8] = b"#!/bin/sh\nexec java -jar \"$0.jar\" \"$@\"\n";

// Checksum constants
pub const WRONG_CHECKSUM: &str = "0000000000000000000000000000000000000000000000000000000000000000";
