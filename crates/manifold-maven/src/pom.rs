//! POM parsing: coordinates, parent inheritance, properties, dependencies,
//! dependency management and BOM imports.

use std::collections::BTreeMap;

use manifold_util::errors::ManifoldError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Nested `${...}` references are expanded at most this many times.
const MAX_INTERPOLATION_DEPTH: usize = 16;

/// A parsed POM (Project Object Model) file.
#[derive(Debug, Clone, Default)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,

    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub dependency_management: Vec<PomDependency>,
}

/// Reference to a parent POM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

/// A dependency declared in a POM file.
#[derive(Debug, Clone, Default)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
    pub type_: Option<String>,
    pub exclusions: Vec<PomExclusion>,
}

/// An exclusion within a dependency declaration.
#[derive(Debug, Clone, Default)]
pub struct PomExclusion {
    pub group_id: String,
    pub artifact_id: Option<String>,
}

impl PomDependency {
    pub fn new(group_id: &str, artifact_id: &str, version: Option<&str>) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scope = Some(scope.to_string());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn excluding(mut self, group_id: &str, artifact_id: Option<&str>) -> Self {
        self.exclusions.push(PomExclusion {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.map(str::to_string),
        });
        self
    }

    /// A `dependencyManagement` entry importing another BOM.
    pub fn is_bom_import(&self) -> bool {
        self.scope.as_deref() == Some("import") && self.type_.as_deref() == Some("pom")
    }

    /// The POM scope, defaulting to `compile`.
    pub fn effective_scope(&self) -> &str {
        self.scope.as_deref().unwrap_or("compile")
    }
}

impl Pom {
    /// A POM with explicit coordinates, for in-memory indices.
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: Some(group_id.to_string()),
            artifact_id: Some(artifact_id.to_string()),
            version: Some(version.to_string()),
            ..Self::default()
        }
    }

    pub fn with_dependency(mut self, dep: PomDependency) -> Self {
        self.dependencies.push(dep);
        self
    }

    pub fn with_managed(mut self, dep: PomDependency) -> Self {
        self.dependency_management.push(dep);
        self
    }

    pub fn with_packaging(mut self, packaging: &str) -> Self {
        self.packaging = Some(packaging.to_string());
        self
    }

    /// Effective group ID (falls back to parent).
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// Effective version (falls back to parent).
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.version.as_str()))
    }

    /// Whether this module carries no code of its own (BOMs, parents).
    pub fn is_pom_only(&self) -> bool {
        self.packaging.as_deref() == Some("pom")
    }

    /// Expand `${property}` references using POM properties and the
    /// `project.*` built-ins. Unknown references are left untouched.
    pub fn interpolate(&self, input: &str) -> String {
        self.interpolate_at(input, 0)
    }

    fn interpolate_at(&self, input: &str, depth: usize) -> String {
        if depth >= MAX_INTERPOLATION_DEPTH || !input.contains("${") {
            return input.to_string();
        }
        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(start) = rest.find("${") {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            out.push_str(&rest[..start]);
            let key = &rest[start + 2..start + len];
            match self.property(key) {
                Some(value) => out.push_str(&self.interpolate_at(&value, depth + 1)),
                None => out.push_str(&rest[start..=start + len]),
            }
            rest = &rest[start + len + 1..];
        }
        out.push_str(rest);
        out
    }

    fn property(&self, key: &str) -> Option<String> {
        let key = key.strip_prefix("pom.").map_or(key.to_string(), |k| format!("project.{k}"));
        match key.as_str() {
            "project.groupId" => self.effective_group_id().map(str::to_string),
            "project.artifactId" => self.artifact_id.clone(),
            "project.version" => self.effective_version().map(str::to_string),
            "project.packaging" => self.packaging.clone(),
            "project.parent.groupId" => self.parent.as_ref().map(|p| p.group_id.clone()),
            "project.parent.artifactId" => self.parent.as_ref().map(|p| p.artifact_id.clone()),
            "project.parent.version" => self.parent.as_ref().map(|p| p.version.clone()),
            other => self.properties.get(other).cloned(),
        }
    }

    /// Interpolate all property references in dependencies and dependency management.
    pub fn resolve_properties(&mut self) {
        let snapshot = self.clone();
        let fix = |dep: &mut PomDependency| {
            dep.group_id = snapshot.interpolate(&dep.group_id);
            dep.artifact_id = snapshot.interpolate(&dep.artifact_id);
            dep.version = dep.version.as_deref().map(|v| snapshot.interpolate(v));
        };
        self.dependencies.iter_mut().for_each(fix);
        self.dependency_management.iter_mut().for_each(fix);
    }

    /// Inherit a parent POM's coordinates, properties and dependency management.
    ///
    /// Entries declared by this POM win over inherited ones.
    pub fn apply_parent(&mut self, parent: &Pom) {
        for (k, v) in &parent.properties {
            self.properties.entry(k.clone()).or_insert_with(|| v.clone());
        }
        if self.group_id.is_none() {
            self.group_id = parent.effective_group_id().map(str::to_string);
        }
        if self.version.is_none() {
            self.version = parent.effective_version().map(str::to_string);
        }
        for inherited in &parent.dependency_management {
            if self.managed(&inherited.group_id, &inherited.artifact_id).is_none() {
                self.dependency_management.push(inherited.clone());
            }
        }
    }

    fn managed(&self, group_id: &str, artifact_id: &str) -> Option<&PomDependency> {
        self.dependency_management
            .iter()
            .find(|d| !d.is_bom_import() && d.group_id == group_id && d.artifact_id == artifact_id)
    }

    /// Look up a version from dependency management for a given group:artifact.
    pub fn managed_version(&self, group_id: &str, artifact_id: &str) -> Option<&str> {
        self.managed(group_id, artifact_id)
            .and_then(|d| d.version.as_deref())
    }

    /// `dependencyManagement` entries that pin versions (BOM imports excluded).
    pub fn managed_versions(&self) -> impl Iterator<Item = &PomDependency> {
        self.dependency_management
            .iter()
            .filter(|d| !d.is_bom_import() && d.version.is_some())
    }

    /// BOMs imported through `dependencyManagement`.
    pub fn bom_imports(&self) -> Vec<&PomDependency> {
        self.dependency_management
            .iter()
            .filter(|d| d.is_bom_import())
            .collect()
    }
}

/// Parse a POM XML string into a `Pom` struct.
pub fn parse_pom(xml: &str) -> miette::Result<Pom> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut state = PomReader::default();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                state.open(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Empty(e)) => {
                state.open(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                state.close();
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| ManifoldError::Index {
                    message: format!("Invalid text in POM: {err}"),
                })?;
                state.text.push_str(&text);
            }
            Ok(Event::CData(e)) => {
                state.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::End(_)) => state.close(),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ManifoldError::Index {
                    message: format!(
                        "Failed to parse POM XML at byte {}: {e}",
                        reader.buffer_position()
                    ),
                }
                .into());
            }
            _ => {}
        }
    }

    if state.pom.artifact_id.is_none() {
        return Err(ManifoldError::Index {
            message: "POM has no <artifactId>".to_string(),
        }
        .into());
    }
    Ok(state.pom)
}

/// Where an open `<dependency>` element will be stored when it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DepTarget {
    Dependencies,
    Management,
}

#[derive(Default)]
struct PomReader {
    pom: Pom,
    path: Vec<String>,
    text: String,
    dep: Option<(DepTarget, PomDependency)>,
    exclusion: Option<PomExclusion>,
    parent: Option<ParentRef>,
}

impl PomReader {
    fn open(&mut self, tag: String) {
        self.path.push(tag);
        self.text.clear();
        let path: Vec<&str> = self.path.iter().map(String::as_str).collect();
        match path.as_slice() {
            ["project", "dependencies", "dependency"] => {
                self.dep = Some((DepTarget::Dependencies, PomDependency::default()));
            }
            ["project", "dependencyManagement", "dependencies", "dependency"] => {
                self.dep = Some((DepTarget::Management, PomDependency::default()));
            }
            [.., "dependency", "exclusions", "exclusion"] if self.dep.is_some() => {
                self.exclusion = Some(PomExclusion::default());
            }
            ["project", "parent"] => self.parent = Some(ParentRef::default()),
            _ => {}
        }
    }

    fn close(&mut self) {
        let text = std::mem::take(&mut self.text);
        let path: Vec<&str> = self.path.iter().map(String::as_str).collect();
        match path.as_slice() {
            ["project", field] => match *field {
                "groupId" => self.pom.group_id = Some(text),
                "artifactId" => self.pom.artifact_id = Some(text),
                "version" => self.pom.version = Some(text),
                "packaging" => self.pom.packaging = Some(text),
                "parent" => self.pom.parent = self.parent.take(),
                _ => {}
            },
            ["project", "parent", field] => {
                if let Some(parent) = self.parent.as_mut() {
                    match *field {
                        "groupId" => parent.group_id = text,
                        "artifactId" => parent.artifact_id = text,
                        "version" => parent.version = text,
                        _ => {}
                    }
                }
            }
            ["project", "properties", key] => {
                self.pom.properties.insert(key.to_string(), text);
            }
            [.., "exclusion", field] if self.exclusion.is_some() => {
                if let Some(excl) = self.exclusion.as_mut() {
                    match *field {
                        "groupId" => excl.group_id = text,
                        "artifactId" => excl.artifact_id = Some(text),
                        _ => {}
                    }
                }
            }
            [.., "exclusion"] => {
                if let (Some(excl), Some((_, dep))) = (self.exclusion.take(), self.dep.as_mut()) {
                    dep.exclusions.push(excl);
                }
            }
            ["project", "dependencies", "dependency"]
            | ["project", "dependencyManagement", "dependencies", "dependency"] => {
                if let Some((target, dep)) = self.dep.take() {
                    match target {
                        DepTarget::Dependencies => self.pom.dependencies.push(dep),
                        DepTarget::Management => self.pom.dependency_management.push(dep),
                    }
                }
            }
            [.., "dependency", field] => {
                if let Some((_, dep)) = self.dep.as_mut() {
                    match *field {
                        "groupId" => dep.group_id = text,
                        "artifactId" => dep.artifact_id = text,
                        "version" => dep.version = Some(text),
                        "scope" => dep.scope = Some(text),
                        "type" => dep.type_ = Some(text),
                        "optional" => dep.optional = text.trim() == "true",
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        self.path.pop();
    }
}
