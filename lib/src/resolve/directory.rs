use super::{FoundClass, Origin, Resolution, Resolver};
use crate::jvm::class_file::parse_class;
use crate::jvm::{BinaryName, Name};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Resolver over a directory tree of `.class` files
///
/// The tree is indexed once when opened: every `a/b/C.class` file under the
/// root is keyed by the binary name `a/b/C`. File contents are read and
/// parsed on resolve.
pub struct DirectoryResolver {
    origin: Origin,
    index: HashMap<BinaryName, PathBuf>,
}

impl DirectoryResolver {
    /// Index a directory tree of class files
    pub fn open(root: impl AsRef<Path>) -> io::Result<DirectoryResolver> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", root.display()),
            ));
        }

        let mut index = HashMap::new();
        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "class") {
                match class_name_for(root, path) {
                    Some(name) => {
                        index.insert(name, path.to_path_buf());
                    }
                    None => log::warn!(
                        "Skipping {} (path does not spell a class name)",
                        path.display()
                    ),
                }
            }
        }
        log::info!("Indexed {} classes under {}", index.len(), root.display());

        Ok(DirectoryResolver {
            origin: Origin::new(root.display().to_string()),
            index,
        })
    }

    /// Names of all indexed classes, sorted
    pub fn class_names(&self) -> Vec<BinaryName> {
        let mut names: Vec<BinaryName> = self.index.keys().cloned().collect();
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        names
    }
}

/// Binary name of a class file, derived from its path relative to the root
fn class_name_for(root: &Path, path: &Path) -> Option<BinaryName> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let mut name = String::new();
    for component in relative.components() {
        let segment = component.as_os_str().to_str()?;
        if !name.is_empty() {
            name.push('/');
        }
        name.push_str(segment);
    }
    BinaryName::from_string(name).ok()
}

impl Resolver for DirectoryResolver {
    fn resolve(&self, name: &BinaryName) -> Resolution {
        let path = match self.index.get(name) {
            Some(path) => path,
            None => {
                return Resolution::NotFound(format!(
                    "class {} is not under {}",
                    name.as_str(),
                    self.origin
                ))
            }
        };

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                return Resolution::Invalid(format!("failed to read {}: {}", path.display(), err))
            }
        };

        let class = match parse_class(&bytes) {
            Ok(class) => class,
            Err(err) => {
                return Resolution::Invalid(format!("failed to parse {}: {}", path.display(), err))
            }
        };

        // A class file that lies about its own name must not satisfy a lookup
        if &class.name != name {
            return Resolution::Invalid(format!(
                "{} declares class {} instead of {}",
                path.display(),
                class.name.as_str(),
                name.as_str()
            ));
        }

        Resolution::Found(FoundClass {
            class: Arc::new(class),
            origin: self.origin.clone(),
        })
    }
}
