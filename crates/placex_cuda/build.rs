use std::{
    env,
    path::{Path, PathBuf},
};

const TOOLKIT_VARS: &[&str] = &["CUDA_HOME", "CUDA_PATH", "CUDA_ROOT", "CUDA_TOOLKIT_ROOT_DIR"];

/// A directory counts as a toolkit when it carries the runtime headers.
fn is_toolkit(dir: &Path) -> bool {
    dir.join("include").join("cuda_runtime_api.h").is_file()
}

fn from_env() -> Option<PathBuf> {
    TOOLKIT_VARS
        .iter()
        .filter_map(|var| env::var_os(var))
        .map(PathBuf::from)
        .find(|dir| is_toolkit(dir))
}

/// `<toolkit>/bin/nvcc` found on `PATH` gives `<toolkit>`.
fn from_nvcc() -> Option<PathBuf> {
    let nvcc = if cfg!(target_os = "windows") { "nvcc.exe" } else { "nvcc" };
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .filter(|bin| bin.join(nvcc).is_file())
        .filter_map(|bin| bin.parent().map(Path::to_path_buf))
        .find(|dir| is_toolkit(dir))
}

/// Versioned installs under the usual prefixes, newest first, after the
/// unversioned symlink.
fn from_install_roots() -> Option<PathBuf> {
    let prefixes: &[&str] = if cfg!(target_os = "windows") {
        &["C:/Program Files/NVIDIA GPU Computing Toolkit/CUDA"]
    } else {
        &["/usr/local", "/opt"]
    };

    for prefix in prefixes {
        let prefix = Path::new(prefix);
        let unversioned = prefix.join("cuda");
        if is_toolkit(&unversioned) {
            return Some(unversioned);
        }

        let Ok(entries) = prefix.read_dir() else { continue };
        let mut versioned: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|dir| {
                let name = dir.file_name().and_then(|name| name.to_str()).unwrap_or_default();
                (name.starts_with("cuda-") || name.starts_with('v')) && is_toolkit(dir)
            })
            .collect();
        versioned.sort_by_key(|dir| version_key(dir));
        if let Some(newest) = versioned.pop() {
            return Some(newest);
        }
    }
    None
}

/// `cuda-12.4` or `v12.4` as `[12, 4]`.
fn version_key(dir: &Path) -> Vec<u32> {
    let name = dir.file_name().and_then(|name| name.to_str()).unwrap_or_default();
    name.trim_start_matches("cuda-")
        .trim_start_matches('v')
        .split('.')
        .map(|part| part.parse().unwrap_or(0))
        .collect()
}

fn main() {
    for var in TOOLKIT_VARS {
        println!("cargo:rerun-if-env-changed={}", var);
    }
    println!("cargo:rerun-if-env-changed=PATH");

    let toolkit = from_env().or_else(from_nvcc).or_else(from_install_roots);
    let Some(toolkit) = toolkit else {
        println!("cargo:warning=CUDA toolkit not found; set CUDA_HOME to its root");
        println!("cargo:rustc-link-lib=cudart");
        return;
    };

    for lib_dir in ["lib64", "lib", "lib/x64"] {
        let dir = toolkit.join(lib_dir);
        if dir.is_dir() {
            println!("cargo:rustc-link-search=native={}", dir.display());
        }
    }
    println!("cargo:rustc-link-lib=cudart");
}
