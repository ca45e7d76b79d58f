use plugreg::checker::check_repo;
use plugreg::diff::{base_branch_from_env, changed_repos};
use plugreg::host::GitHub;

pub(crate) fn run(registry_path: &str) {
    // Missing configuration is fatal before any diff or remote work.
    let base_branch = match base_branch_from_env() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let repos = match changed_repos(&base_branch, registry_path) {
        Ok(repos) => repos,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if repos.is_empty() {
        println!("No new plugins detected");
        return;
    }

    println!("Checking {} plugin(s)\n", repos.len());

    let host = GitHub::from_env();
    let mut failed = false;

    for repo in &repos {
        println!("{repo}:");
        let errors = check_repo(&host, repo, &mut |line| println!("  ✓ {line}"));

        for error in &errors {
            // GitHub Actions error annotation, one per line.
            eprintln!("  ::error::{error}");
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }

    println!("All checks passed!");
}
