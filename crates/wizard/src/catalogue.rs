//! Body areas offered on the body-area step.

/// One selectable body area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyAreaOption {
    /// Label shown to the clinician.
    pub name: &'static str,
    /// Value sent as `bodyArea`.
    pub query: &'static str,
    /// Anatomical model shown beside the panel picker, when one exists.
    pub model: Option<&'static str>,
}

const fn area(name: &'static str, query: &'static str) -> BodyAreaOption {
    BodyAreaOption {
        name,
        query,
        model: None,
    }
}

pub const BODY_AREAS: [BodyAreaOption; 24] = [
    area("Abdomen", "abdomen"),
    area("Abdomen-Pelvis", "abdomen-pelvis"),
    BodyAreaOption {
        name: "Breast",
        query: "breast",
        model: Some("/3d-model/human_female_breast_anatomy.glb"),
    },
    BodyAreaOption {
        name: "Cardiac",
        query: "cardiac",
        model: Some("/3d-model/stylizedhumanheart.glb"),
    },
    area("Cardiac-Chest", "cardiac-chest"),
    area("Cardiac-Chest-Pelvis", "cardiac-chest-pelvis"),
    area("Chest", "chest"),
    area("Chest-Abdomen", "chest-abdomen"),
    area("Chest-Abdomen-Pelvis", "chest-abdomen-pelvis"),
    area("Extremities", "extremities"),
    area("Head", "head"),
    area("Head-Neck", "head-neck"),
    area("Head-Neck-Chest-Abdomen", "head-neck-chest-abdomen"),
    area("Head-Spine", "head-spine"),
    area("Lower Extremity", "lower extremity"),
    area("Maxface", "maxface"),
    area("Neck", "neck"),
    area("Neck-Chest", "neck-chest"),
    area("Neck-Chest-Abdomen-Pelvis", "neck-chest-abdomen-pelvis"),
    area("Pelvis", "pelvis"),
    area("Spine", "spine"),
    area("Spine-Pelvis", "spine-pelvis"),
    area("Unspecified", "unspecified"),
    area("Upper Extremity", "upper extremity"),
];

/// Look up a body area by label or query value, ignoring case.
pub fn find_body_area(input: &str) -> Option<&'static BodyAreaOption> {
    let input = input.trim();
    BODY_AREAS
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(input) || a.query.eq_ignore_ascii_case(input))
}
