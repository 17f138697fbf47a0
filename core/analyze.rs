//! Heuristic project analysis over the included-file path set. All three
//! outputs are pure functions of the relative path list; file content is
//! never reopened here.

use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analysis {
    /// Single best-guess archetype, first matching rule wins.
    pub architecture: String,
    /// Additive, unordered technology labels.
    pub technologies: BTreeSet<String>,
    /// Additive, unordered structural-convention labels.
    pub patterns: BTreeSet<String>,
}

pub fn analyze_paths(relative_paths: &[String]) -> Analysis {
    Analysis {
        architecture: detect_architecture(relative_paths),
        technologies: detect_technologies(relative_paths),
        patterns: detect_patterns(relative_paths),
    }
}

/// Ordered first-match-wins rules. Framework-specific layouts are checked
/// before generic ones so that e.g. a Next.js tree containing
/// `src/components/` still classifies as Next.js.
fn detect_architecture(paths: &[String]) -> String {
    let has = |needle: &str| paths.iter().any(|p| p.contains(needle));
    let has_file = |name: &str| {
        paths
            .iter()
            .any(|p| p.rsplit('/').next().is_some_and(|f| f == name))
    };

    if has("pages/") || has("app/") {
        "Next.js/Nuxt-style web application".to_string()
    } else if has("src/components/") {
        "Component-based frontend application".to_string()
    } else if has_file("main.py") || has_file("app.py") || has_file("manage.py") {
        "Python application".to_string()
    } else if has_file("server.js") || has_file("server.ts") || has_file("index.js") {
        "Node.js server application".to_string()
    } else if has_file("main.rs") || has_file("lib.rs") {
        "Rust application".to_string()
    } else if has_file("main.go") {
        "Go application".to_string()
    } else {
        "Unknown".to_string()
    }
}

/// Each rule may add its own label independently; multiple technologies
/// coexist.
fn detect_technologies(paths: &[String]) -> BTreeSet<String> {
    let mut technologies = BTreeSet::new();
    let has_file = |name: &str| {
        paths
            .iter()
            .any(|p| p.rsplit('/').next().is_some_and(|f| f == name))
    };
    let has_ext = |ext: &str| {
        paths
            .iter()
            .any(|p| p.rsplit('.').next().is_some_and(|e| e == ext) && p.contains('.'))
    };

    if has_file("package.json") {
        technologies.insert("Node.js".to_string());
    }
    if has_ext("ts") || has_ext("tsx") || has_file("tsconfig.json") {
        technologies.insert("TypeScript".to_string());
    }
    if has_ext("jsx") || has_ext("tsx") {
        technologies.insert("React".to_string());
    }
    if has_ext("vue") {
        technologies.insert("Vue".to_string());
    }
    if has_ext("js") || has_ext("mjs") || has_ext("cjs") {
        technologies.insert("JavaScript".to_string());
    }
    if has_ext("py") || has_file("requirements.txt") || has_file("pyproject.toml") {
        technologies.insert("Python".to_string());
    }
    if has_file("Cargo.toml") || has_ext("rs") {
        technologies.insert("Rust".to_string());
    }
    if has_file("go.mod") || has_ext("go") {
        technologies.insert("Go".to_string());
    }
    if has_file("Gemfile") || has_ext("rb") {
        technologies.insert("Ruby".to_string());
    }
    if has_file("composer.json") || has_ext("php") {
        technologies.insert("PHP".to_string());
    }
    if has_file("Dockerfile") || has_file("docker-compose.yml") {
        technologies.insert("Docker".to_string());
    }
    if has_ext("css") || has_ext("scss") || has_ext("sass") || has_ext("less") {
        technologies.insert("CSS".to_string());
    }
    if has_ext("sql") {
        technologies.insert("SQL".to_string());
    }
    technologies
}

fn detect_patterns(paths: &[String]) -> BTreeSet<String> {
    let mut patterns = BTreeSet::new();
    let has = |needle: &str| paths.iter().any(|p| p.contains(needle));

    if has("hooks/") || paths.iter().any(|p| file_stem(p).starts_with("use")) {
        patterns.insert("React hooks".to_string());
    }
    if has("api/") || has("routes/") {
        patterns.insert("API routes".to_string());
    }
    if has("models/") || has("schemas/") {
        patterns.insert("Data models".to_string());
    }
    if has("utils/") || has("helpers/") || has("lib/") {
        patterns.insert("Utility modules".to_string());
    }
    if has("test") || has("spec") || has("__tests__/") {
        patterns.insert("Automated tests".to_string());
    }
    if has("components/") {
        patterns.insert("Reusable components".to_string());
    }
    if has("middleware/") {
        patterns.insert("Middleware layer".to_string());
    }
    patterns
}

fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.split('.').next().unwrap_or(name)
}
