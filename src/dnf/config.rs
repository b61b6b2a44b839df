//! Rendering of dnf configuration files.

use std::fmt::Write;

use crate::rpm::RpmRepository;

/// Contents of `dnf.conf`.
pub fn render_dnf_conf(filelists: bool) -> String {
    let mut conf = String::from("[main]\ninstall_weak_deps=0\n");
    if filelists {
        conf.push_str("optional_metadata_types=filelists\n");
    }
    conf
}

/// Contents of a `.repo` file with one section per repository, in order.
pub fn render_repo_file(repositories: &[RpmRepository]) -> String {
    let mut out = String::new();

    for (i, repo) in repositories.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        // Writing to a String cannot fail
        let _ = writeln!(out, "[{}]", repo.id);
        let _ = writeln!(out, "name={}", repo.id);
        let _ = writeln!(out, "{}", repo.url);
        let _ = writeln!(out, "gpgcheck={}", u8::from(!repo.gpgurls.is_empty()));
        if !repo.gpgurls.is_empty() {
            let _ = writeln!(out, "gpgkey={}", repo.gpgurls.join(" "));
        }
        let _ = writeln!(out, "enabled={}", u8::from(repo.enabled));
    }

    out
}
