use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub mod animator;
pub mod drawer;
pub mod easing;
pub mod geo;
pub mod map_view;
pub mod page;
pub mod signal;
pub mod style;
pub mod timers;
pub mod widget;

pub use geo::{LatLng, LatLngBounds};
pub use style::{ElementType, FeatureType, StyleSet};

/// Everything the page shows: the owner blurb, the work history and the projects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resume {
    /// Hero section text
    pub owner: Owner,
    /// Where every map flight starts
    pub origin: LatLng,
    /// Work history, in navigation order
    pub jobs: Vec<JobEntry>,
    /// Showcase entries listed under the job detail
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Hero section text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Owner {
    /// Display name (e.g., "Doug Rabinsmith")
    pub name: String,
    /// One-line role summary
    pub headline: String,
    /// Short paragraph under the headline
    #[serde(default)]
    pub blurb: String,
}

/// A single work-history record with the location the map travels to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEntry {
    /// Stable identifier, unique within a resume
    pub key: String,
    /// Employer name
    pub name: String,
    /// Human readable span (e.g., "2019 - 2023")
    pub years: String,
    /// Free text shown in the detail panel
    pub description: String,
    /// Office location
    pub coordinates: LatLng,
    /// Path of the employer logo inside the asset bundle
    pub logo_asset: String,
    /// Path of the city picture inside the asset bundle
    pub city_image_asset: String,
}

/// A showcase project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Project page, opened with the platform opener
    pub link: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub role: String,
}

/// Errors found while checking a loaded resume.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResumeError {
    #[error("resume has no jobs")]
    NoJobs,
    #[error("duplicate job key '{0}'")]
    DuplicateKey(String),
    #[error("job '{key}' has out of range coordinates")]
    InvalidCoordinates { key: String },
}

impl Resume {
    /// Checks the invariants the page controller relies on.
    pub fn validate(&self) -> Result<(), ResumeError> {
        if self.jobs.is_empty() {
            return Err(ResumeError::NoJobs);
        }

        let mut seen = HashSet::new();
        for job in &self.jobs {
            if !seen.insert(job.key.as_str()) {
                return Err(ResumeError::DuplicateKey(job.key.clone()));
            }
            if !job.coordinates.is_valid() {
                return Err(ResumeError::InvalidCoordinates {
                    key: job.key.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn job(&self, index: usize) -> Option<&JobEntry> {
        self.jobs.get(index)
    }

    pub fn job_index(&self, key: &str) -> Option<usize> {
        self.jobs.iter().position(|job| job.key == key)
    }

    /// Index after `index` in key order, wrapping around.
    pub fn next_index(&self, index: usize) -> Option<usize> {
        if self.jobs.is_empty() {
            return None;
        }
        Some((index + 1) % self.jobs.len())
    }

    /// Index before `index` in key order, wrapping around.
    pub fn previous_index(&self, index: usize) -> Option<usize> {
        if self.jobs.is_empty() {
            return None;
        }
        let len = self.jobs.len();
        Some((index % len + len - 1) % len)
    }
}

/// Decorative geometry drawn by the map view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Atlas {
    /// Land outlines as closed rings
    #[serde(default)]
    pub land: Vec<Vec<LatLng>>,
    /// Labelled points (countries, states, cities)
    #[serde(default)]
    pub places: Vec<Place>,
    /// Highways drawn as polylines
    #[serde(default)]
    pub roads: Vec<Road>,
}

/// A labelled point on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    /// Which style rule controls the label
    pub feature: FeatureType,
    pub position: LatLng,
}

/// A highway polyline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Road {
    pub name: String,
    pub path: Vec<LatLng>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(key: &str, lat: f64, lng: f64) -> JobEntry {
        JobEntry {
            key: key.to_owned(),
            name: key.to_uppercase(),
            years: "2020 - 2022".to_owned(),
            description: String::new(),
            coordinates: LatLng::new(lat, lng),
            logo_asset: String::new(),
            city_image_asset: String::new(),
        }
    }

    fn resume(jobs: Vec<JobEntry>) -> Resume {
        Resume {
            jobs,
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_rejects_empty_and_duplicates() {
        assert_eq!(resume(vec![]).validate(), Err(ResumeError::NoJobs));

        let dup = resume(vec![job("a", 1.0, 1.0), job("a", 2.0, 2.0)]);
        assert_eq!(dup.validate(), Err(ResumeError::DuplicateKey("a".into())));

        let bad = resume(vec![job("a", 120.0, 1.0)]);
        assert_eq!(
            bad.validate(),
            Err(ResumeError::InvalidCoordinates { key: "a".into() })
        );

        assert!(resume(vec![job("a", 1.0, 1.0), job("b", 2.0, 2.0)])
            .validate()
            .is_ok());
    }

    #[test]
    fn test_key_order_navigation_wraps() {
        let r = resume(vec![job("a", 0.0, 0.0), job("b", 0.0, 0.0), job("c", 0.0, 0.0)]);
        assert_eq!(r.job_index("b"), Some(1));
        assert_eq!(r.job_index("z"), None);
        assert_eq!(r.next_index(1), Some(2));
        assert_eq!(r.next_index(2), Some(0));
        assert_eq!(r.previous_index(0), Some(2));
        assert_eq!(r.previous_index(2), Some(1));
        assert_eq!(resume(vec![]).next_index(0), None);
    }

    #[test]
    fn test_resume_parses_from_ron() {
        let text = r#"(
            owner: (name: "Doug", headline: "Engineer"),
            origin: (lat: 41.0437, lng: -74.2156),
            jobs: [(
                key: "hirez",
                name: "Hi-Rez Studios",
                years: "2016 - 2024",
                description: "Web",
                coordinates: (lat: 34.0598, lng: -84.2456),
                logo_asset: "logos/hirez.svg",
                city_image_asset: "cities/alpharetta.svg",
            )],
        )"#;
        let parsed: Resume = ron::from_str(text).unwrap();
        assert_eq!(parsed.jobs[0].key, "hirez");
        assert!(parsed.projects.is_empty());
        assert!(parsed.validate().is_ok());
    }
}
