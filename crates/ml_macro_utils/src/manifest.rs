use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The caller's `Cargo.toml`, used to find how a workspace crate is named
/// from the crate that invokes a proc-macro.
///
/// Generated code must spell paths that resolve in the *invoking* crate,
/// which may depend on `ml_reflect` directly or only through the
/// `member_lens` facade.
///
/// # Example
///
/// ```rust
/// # use ml_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("ml_reflect"));
/// ```
///
/// # Resolution rules
///
/// 1. If the requested crate is listed in `dependencies`, return `::crate_name`.
/// 2. If the requested crate name begins with `ml_` and the caller depends on
///    the facade `member_lens`, return `::member_lens::short_name`
///    (e.g. `ml_reflect` -> `::member_lens::reflect`).
/// 3. Repeat steps 1-2 in `dev-dependencies`.
/// 4. Otherwise, fall back to the absolute path `::crate_name`.
///
/// A crate that refers to itself through generated code should declare
/// `extern crate self as crate_name;` so the fallback path resolves.
#[derive(Debug)]
pub struct Manifest {
    manifest: Option<Document<Box<str>>>,
    modified_time: Option<SystemTime>,
}

const FACADE_NAME: &str = "member_lens";
const CRATE_PREFIX: &str = "ml_";

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> Option<PathBuf> {
        let mut path = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR")?);
        path.push("Cargo.toml");
        Some(path)
    }

    #[inline(never)]
    fn load(path: &PathBuf, modified_time: Option<SystemTime>) -> Self {
        let manifest = std::fs::read_to_string(path)
            .ok()
            .and_then(|text| Document::parse(text.into_boxed_str()).ok());
        Self {
            manifest,
            modified_time,
        }
    }

    fn parse_path(path: &str) -> syn::Path {
        syn::parse_str(path).unwrap_or_else(|err| panic!("`{path}` is not a valid crate path: {err}"))
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::parse_path(&format!("::{name}")));
        }
        let module = name.strip_prefix(CRATE_PREFIX)?;
        if deps.contains_key(FACADE_NAME) {
            return Some(Self::parse_path(&format!("::{FACADE_NAME}::{module}")));
        }
        None
    }

    /// Return a [`syn::Path`] for the package named `name` as seen from the
    /// invoking crate. See the type-level documentation for the rules.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        let Some(manifest) = &self.manifest else {
            return Self::parse_path(&format!("::{name}"));
        };

        for table in ["dependencies", "dev-dependencies"] {
            if let Some(Item::Table(deps)) = manifest.get(table)
                && let Some(path) = Self::find_in_deps(deps, name)
            {
                return path;
            }
        }

        Self::parse_path(&format!("::{name}"))
    }

    /// Run `func` with the [`Manifest`] of the caller's `Cargo.toml`.
    ///
    /// Manifests are cached per path and re-read when the file's modification
    /// time changes. Reading still takes a global lock, so a proc-macro should
    /// call this once per invocation and pass the resulting path around.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let Some(path) = Self::manifest_path() else {
            return func(&Manifest {
                manifest: None,
                modified_time: None,
            });
        };
        let modified_time = std::fs::metadata(&path)
            .and_then(|metadata| metadata.modified())
            .ok();

        let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(manifest) = manifests.get(&path)
            && manifest.modified_time.is_some()
            && manifest.modified_time == modified_time
        {
            return func(manifest);
        }
        drop(manifests);

        let manifest = Self::load(&path, modified_time);
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::Manifest;
    use quote::ToTokens;
    use toml_edit::Document;

    fn manifest(text: &str) -> Manifest {
        Manifest {
            manifest: Some(Document::parse(text.to_owned().into_boxed_str()).unwrap()),
            modified_time: None,
        }
    }

    fn render(path: syn::Path) -> String {
        path.to_token_stream().to_string().replace(' ', "")
    }

    #[test]
    fn direct_dependency() {
        let m = manifest("[dependencies]\nml_reflect = \"0.0.1\"\n");
        assert_eq!(render(m.get_crate_path("ml_reflect")), "::ml_reflect");
    }

    #[test]
    fn through_facade() {
        let m = manifest("[dependencies]\nmember_lens = \"0.0.1\"\n");
        assert_eq!(render(m.get_crate_path("ml_reflect")), "::member_lens::reflect");
    }

    #[test]
    fn dev_dependency_and_fallback() {
        let m = manifest("[dev-dependencies]\nmember_lens = \"0.0.1\"\n");
        assert_eq!(render(m.get_crate_path("ml_reflect")), "::member_lens::reflect");

        let m = manifest("[dependencies]\nserde = \"1\"\n");
        assert_eq!(render(m.get_crate_path("ml_reflect")), "::ml_reflect");
    }

    #[test]
    #[should_panic(expected = "`::not a crate` is not a valid crate path")]
    fn malformed_crate_name_panics() {
        let m = manifest("[dependencies]\nserde = \"1\"\n");
        m.get_crate_path("not a crate");
    }
}
