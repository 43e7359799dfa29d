//! Technology ecosystem graph: curated "knowing X implies familiarity with Y" edges.
//!
//! Keys and values are stored in normalized form (see `normalize_skill`).
//! Edges are one-directional: "sql" lists "postgresql" and "postgresql" lists
//! "sql", but "docker" lists "microservices" while "microservices" does not
//! list "docker". Callers check both directions. Gaps in the inverse edges are
//! left as curated; filling them in would change which pairs match.

use std::collections::HashMap;
use std::sync::LazyLock;

type Ecosystem = HashMap<&'static str, &'static [&'static str]>;

const ECOSYSTEM_EDGES: &[(&str, &[&str])] = &[
    // JavaScript
    (
        "javascript",
        &[
            "js", "typescript", "node.js", "nodejs", "react", "angular", "vue", "next.js",
            "express", "npm", "yarn",
        ],
    ),
    (
        "node.js",
        &["javascript", "express", "rest api", "backend", "npm", "server side"],
    ),
    (
        "react",
        &["frontend", "frontend development", "javascript", "jsx", "ui", "component"],
    ),
    (
        "next.js",
        &["frontend", "frontend development", "react", "javascript", "typescript"],
    ),
    (
        "typescript",
        &["javascript", "type safety", "frontend", "backend"],
    ),
    // Python
    (
        "python",
        &[
            "django", "flask", "fastapi", "pandas", "numpy", "tensorflow", "pytorch",
            "rest api",
        ],
    ),
    (
        "django",
        &["python", "web framework", "orm", "rest api", "backend", "mvc"],
    ),
    (
        "flask",
        &["python", "web framework", "rest api", "backend", "microservices"],
    ),
    (
        "fastapi",
        &["python", "rest api", "async", "backend", "microservices"],
    ),
    // Java
    (
        "java",
        &[
            "spring", "spring boot", "hibernate", "maven", "gradle", "enterprise", "rest api",
        ],
    ),
    (
        "spring boot",
        &["java", "spring", "rest api", "microservices", "enterprise", "backend"],
    ),
    (
        "spring",
        &["java", "dependency injection", "enterprise", "backend"],
    ),
    // Databases
    (
        "sql",
        &[
            "postgresql", "mysql", "sql server", "oracle", "database design",
            "query optimization",
        ],
    ),
    (
        "postgresql",
        &["sql", "relational database", "acid", "database design"],
    ),
    ("mysql", &["sql", "relational database", "database design"]),
    (
        "mongodb",
        &["nosql", "document database", "json", "database"],
    ),
    ("redis", &["nosql", "cache", "in memory", "database"]),
    // Cloud & DevOps
    (
        "aws",
        &[
            "cloud", "cloud platforms", "lambda", "ec2", "s3", "rds", "dynamodb", "devops",
        ],
    ),
    (
        "azure",
        &["cloud", "cloud platforms", "microsoft cloud", "devops"],
    ),
    (
        "gcp",
        &["cloud", "cloud platforms", "google cloud", "devops"],
    ),
    (
        "cloud platforms",
        &["aws", "azure", "gcp", "cloud", "devops"],
    ),
    (
        "docker",
        &["containerization", "devops", "microservices", "deployment"],
    ),
    (
        "kubernetes",
        &["container orchestration", "devops", "microservices", "docker"],
    ),
    (
        "jenkins",
        &["ci/cd", "devops", "automation", "deployment"],
    ),
    (
        "git",
        &["version control", "collaboration", "github", "gitlab"],
    ),
    // Web
    (
        "html",
        &[
            "web development", "frontend", "frontend development", "markup", "css",
            "javascript",
        ],
    ),
    (
        "css",
        &[
            "web development", "frontend", "frontend development", "styling",
            "responsive design",
        ],
    ),
    (
        "rest api",
        &["http", "json", "backend", "web services", "api design", "api integration"],
    ),
    (
        "api integration",
        &["rest api", "http", "json", "backend", "web services"],
    ),
    (
        "frontend development",
        &["html", "css", "javascript", "react", "angular", "vue", "next.js"],
    ),
    (
        "backend development",
        &["node.js", "express", "django", "flask", "spring boot", "rest api"],
    ),
    // Practices
    (
        "agile",
        &["scrum", "sprint", "collaboration", "iterative development"],
    ),
    (
        "full stack",
        &["frontend", "backend", "database", "web development"],
    ),
    (
        "microservices",
        &["distributed systems", "api", "scalability", "architecture"],
    ),
];

static SKILL_ECOSYSTEMS: LazyLock<Ecosystem> =
    LazyLock::new(|| ECOSYSTEM_EDGES.iter().copied().collect());

/// Skills implied by `skill`. `skill` must already be normalized.
/// Returns `None` when the graph has no entry for it.
pub fn related_skills(skill: &str) -> Option<&'static [&'static str]> {
    SKILL_ECOSYSTEMS.get(skill).copied()
}

/// True if the graph has a curated edge `from -> to`. Both sides normalized.
pub fn implies(from: &str, to: &str) -> bool {
    related_skills(from).is_some_and(|related| related.contains(&to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::normalize::normalize_skill;

    #[test]
    fn test_sql_and_postgresql_are_linked_both_ways() {
        assert!(implies("sql", "postgresql"));
        assert!(implies("postgresql", "sql"));
    }

    #[test]
    fn test_edges_are_asymmetric() {
        assert!(implies("docker", "microservices"));
        assert!(!implies("microservices", "docker"));
    }

    #[test]
    fn test_unknown_skill_has_no_entry() {
        assert!(related_skills("quantum cryptanalysis").is_none());
        assert!(!implies("quantum cryptanalysis", "python"));
    }

    #[test]
    fn test_react_uses_later_curated_edges() {
        let related = related_skills("react").unwrap();
        assert!(related.contains(&"frontend development"));
        assert!(!related.contains(&"gatsby"));
    }

    #[test]
    fn test_keys_and_values_are_normalized() {
        for (key, related) in SKILL_ECOSYSTEMS.iter() {
            assert_eq!(normalize_skill(key), *key, "key {key:?} not normalized");
            for skill in related.iter() {
                assert_eq!(normalize_skill(skill), *skill, "value {skill:?} not normalized");
            }
        }
    }
}
