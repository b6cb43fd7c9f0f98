/// Sort build-derived entries lexicographically.
pub fn sort_build_entries(mut entries: Vec<String>) -> Vec<String> {
    entries.sort();
    entries
}

/// User entries in configured order, then build entries.
///
/// Duplicates are kept: a jar listed by the user and also reported by the
/// build tool appears twice.
pub fn assemble_classpath(user: &[String], build: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(user.len() + build.len());
    out.extend_from_slice(user);
    out.extend_from_slice(build);
    out
}
