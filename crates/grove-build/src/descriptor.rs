use std::path::Path;

use grove_core::find_up_any;

use crate::{BuildDescriptor, BuildSystemKind};

pub const MAVEN_DESCRIPTOR: &str = "pom.xml";
pub const GRADLE_DESCRIPTOR: &str = "build.gradle";

/// Find the build descriptor that owns `source_file`.
///
/// The search starts in the file's directory. Maven is looked for all the way
/// up to the filesystem root before Gradle is considered at all, so a
/// `pom.xml` anywhere in the ancestry beats a nearer `build.gradle`.
pub fn locate_build_descriptor(source_file: &Path) -> Option<BuildDescriptor> {
    let start = source_file.parent()?;

    let found = find_up_any(start, &[MAVEN_DESCRIPTOR, GRADLE_DESCRIPTOR]).map(|path| {
        let kind = if path.ends_with(MAVEN_DESCRIPTOR) {
            BuildSystemKind::Maven
        } else {
            BuildSystemKind::Gradle
        };
        BuildDescriptor { path, kind }
    });

    match &found {
        Some(descriptor) => tracing::debug!(
            target: "grove.build",
            file = %source_file.display(),
            descriptor = %descriptor.path.display(),
            kind = %descriptor.kind,
            "found build descriptor"
        ),
        None => tracing::debug!(
            target: "grove.build",
            file = %source_file.display(),
            "no build descriptor in ancestry"
        ),
    }

    found
}
