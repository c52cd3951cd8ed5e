use std::env;
use std::process::Command;

// CPU features that unlock a wide backend (or a capability of one)
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    cfg_flag: &'static str,
    detected: bool,
    nightly_only: bool,
}

impl CpuFeature {
    // Every feature is emitted independently: the backends are type-level tags
    // that coexist, so there is no "highest priority wins" selection.
    fn features() -> Vec<CpuFeature> {
        vec![
            CpuFeature {
                name: "avx",
                cfg_flag: "avx",
                detected: false,
                nightly_only: false,
            },
            CpuFeature {
                name: "fma",
                cfg_flag: "fma",
                detected: false,
                nightly_only: false,
            },
            CpuFeature {
                name: "avx512f",
                cfg_flag: "avx512",
                detected: false,
                nightly_only: true,
            },
        ]
    }

    // `fma` only matters as a capability of the 256-bit backend.
    fn requires(&self) -> Option<&'static str> {
        match self.name {
            "fma" => Some("avx"),
            _ => None,
        }
    }
}

// Feature detection trait to make implementations more modular
trait CpuFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]);
    fn is_applicable(&self) -> bool;
}

// Linux CPU feature detector
struct LinuxDetector;
impl CpuFeatureDetector for LinuxDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") {
            // Match whole flag tokens, "avx" must not match "avx2".
            let flags: Vec<String> = cpuinfo
                .lines()
                .filter(|line| line.starts_with("flags"))
                .take(1)
                .flat_map(|line| line.split_whitespace().map(str::to_lowercase))
                .collect();

            for feature in features.iter_mut() {
                feature.detected |= flags.iter().any(|flag| flag == feature.name);
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "linux")
    }
}

// macOS CPU feature detector
struct MacOSDetector;
impl CpuFeatureDetector for MacOSDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let output = Command::new("sysctl").args(["-a"]).output();

        if let Ok(output) = output {
            let contents = String::from_utf8_lossy(&output.stdout).to_lowercase();

            for feature in features.iter_mut() {
                match feature.name {
                    "avx" => feature.detected |= contents.contains("hw.optional.avx1_0: 1"),
                    "fma" => feature.detected |= contents.contains("hw.optional.fma: 1"),
                    "avx512f" => feature.detected |= contents.contains("hw.optional.avx512f: 1"),
                    _ => {}
                }
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "macos")
    }
}

// Features requested explicitly with `-C target-feature` (works for cross builds too)
struct TargetFeatureDetector;
impl CpuFeatureDetector for TargetFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let enabled = env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default();
        let enabled: Vec<&str> = enabled.split(',').collect();

        for feature in features.iter_mut() {
            feature.detected |= enabled.contains(&feature.name);
        }
    }

    fn is_applicable(&self) -> bool {
        true
    }
}

// Factory that creates the appropriate detector for the current OS
struct PlatformDetector;
impl PlatformDetector {
    fn cpu_features_detectors() -> Vec<Box<dyn CpuFeatureDetector>> {
        vec![Box::new(LinuxDetector), Box::new(MacOSDetector)]
    }

    fn compiler_channel() -> String {
        let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
        let version_info = Command::new(rustc)
            .args(["--version", "--verbose"])
            .output()
            .map(|output| String::from_utf8_lossy(&output.stdout).into_owned())
            .unwrap_or_default();

        if version_info.contains("nightly") {
            "nightly".to_string()
        } else {
            "stable".to_string()
        }
    }

    fn detect_cpu_features(features: &mut [CpuFeature]) {
        // Find the applicable detector and use it
        for detector in Self::cpu_features_detectors() {
            if detector.is_applicable() {
                detector.detect_features(features);
                break;
            }
        }
    }

    fn apply(features: &[CpuFeature], nightly_build: bool) {
        println!("cargo::rustc-check-cfg=cfg(avx)");
        println!("cargo::rustc-check-cfg=cfg(fma)");
        println!("cargo::rustc-check-cfg=cfg(avx512)");

        let enabled = |name: &str| {
            features
                .iter()
                .any(|feature| feature.name == name && feature.detected)
        };

        for feature in features.iter().filter(|feature| feature.detected) {
            if feature.nightly_only && !nightly_build {
                println!("cargo:warning={} detected but requires a nightly toolchain", feature.name);
                continue;
            }
            if feature.requires().is_some_and(|parent| !enabled(parent)) {
                continue;
            }

            println!("cargo:rustc-cfg={}", feature.cfg_flag);
        }
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SIMDLANES_GENERIC_ONLY");

    // Detect rustc channel (stable, beta, nightly)
    let rustc_channel = PlatformDetector::compiler_channel();
    println!("cargo:rustc-cfg=rustc_channel=\"{rustc_channel}\"");
    println!("cargo::rustc-check-cfg=cfg(rustc_channel, values(\"nightly\", \"stable\"))");

    let nightly_build = rustc_channel == "nightly";

    let mut features = CpuFeature::features();

    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let x86_target = target_arch == "x86" || target_arch == "x86_64";
    let generic_only = env::var("SIMDLANES_GENERIC_ONLY").is_ok_and(|value| value == "1");

    if x86_target && !generic_only {
        // Only probe the host CPU for native builds
        let host = env::var("HOST").unwrap_or_default();
        let target = env::var("TARGET").unwrap_or_default();
        if host == target {
            PlatformDetector::detect_cpu_features(&mut features);
        }

        TargetFeatureDetector.detect_features(&mut features);
    }

    PlatformDetector::apply(&features, nightly_build);
}
