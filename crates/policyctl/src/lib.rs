use std::io::Write;

pub mod source;

/// policyctl compares alert policy documents as the policy operator does,
/// to preview whether a change would be applied to the remote alerting API.
#[derive(Debug, clap::Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Debug, clap::Subcommand)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Compare a desired policy document against an observed one.
    ///
    /// Prints a JSON report of the first difference found, if any.
    /// Exits zero if the documents are equivalent, or two if they've drifted.
    Compare(Compare),
    /// Print the fingerprint of each condition of a policy document.
    Fingerprint(Fingerprint),
    /// Emit the PolicySpec JSON-Schema.
    JsonSchema,
}

#[derive(Debug, clap::Args)]
#[clap(rename_all = "kebab-case")]
pub struct Compare {
    /// Path of the desired policy document, or "-" for stdin.
    #[clap(long, env = "POLICYCTL_DESIRED")]
    desired: String,
    /// Path of the observed policy document, or "-" for stdin.
    /// If the document is a custom resource having a `status.applied_spec`,
    /// then that applied spec is the one compared.
    #[clap(long, env = "POLICYCTL_OBSERVED")]
    observed: String,
}

#[derive(Debug, clap::Args)]
pub struct Fingerprint {
    /// Path of the policy document, or "-" for stdin.
    path: String,
}

#[derive(Debug, serde::Serialize)]
struct Report {
    equal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    mismatch: Option<drift::Mismatch>,
}

/// Exit code of a `compare` which found drift.
pub const EXIT_DRIFTED: i32 = 2;

impl Cli {
    /// Run the command, returning the process exit code.
    pub fn run(&self) -> anyhow::Result<i32> {
        let mut stdout = std::io::stdout().lock();

        match &self.cmd {
            Command::Compare(compare) => do_compare(compare, &mut stdout),
            Command::Fingerprint(args) => do_fingerprint(args, &mut stdout),
            Command::JsonSchema => {
                let schema = models::PolicySpec::root_json_schema();
                serde_json::to_writer_pretty(&mut stdout, &schema)?;
                writeln!(stdout)?;
                Ok(0)
            }
        }
    }
}

fn do_compare(Compare { desired, observed }: &Compare, w: &mut impl Write) -> anyhow::Result<i32> {
    if desired == "-" && observed == "-" {
        anyhow::bail!("at most one of --desired and --observed may read from stdin");
    }
    let desired = source::load(desired)?.spec;
    let observed = source::load(observed)?.into_applied();

    let report = compare(&desired, &observed);
    tracing::debug!(equal = report.equal, policy = %desired.name, "compared policies");

    serde_json::to_writer_pretty(&mut *w, &report)?;
    writeln!(w)?;

    Ok(if report.equal { 0 } else { EXIT_DRIFTED })
}

fn compare(desired: &models::PolicySpec, observed: &models::PolicySpec) -> Report {
    let mismatch = drift::explain(desired, observed);
    Report {
        equal: mismatch.is_none(),
        mismatch,
    }
}

fn do_fingerprint(Fingerprint { path }: &Fingerprint, w: &mut impl Write) -> anyhow::Result<i32> {
    let spec = source::load(path)?.spec;

    for (index, condition) in spec.conditions.iter().enumerate() {
        writeln!(
            w,
            "{index}\t{}\t{}",
            drift::fingerprint(&condition.spec),
            condition.spec.name
        )?;
    }
    Ok(0)
}

#[cfg(test)]
mod test {
    use super::*;
    use models::PolicySpec;

    fn write_doc(dir: &tempfile::TempDir, name: &str, spec: &PolicySpec) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, serde_yaml::to_string(spec).unwrap()).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_compare_reports() {
        let dir = tempfile::tempdir().unwrap();
        let mut drifted = PolicySpec::example();
        drifted.conditions.push(drifted.conditions[0].clone());

        let desired = write_doc(&dir, "desired.yaml", &PolicySpec::example());
        let same = write_doc(&dir, "same.yaml", &PolicySpec::example());
        let drifted = write_doc(&dir, "drifted.yaml", &drifted);

        let mut out = Vec::new();
        let code = do_compare(
            &Compare {
                desired: desired.clone(),
                observed: same,
            },
            &mut out,
        )
        .unwrap();

        assert_eq!(code, 0);
        insta::assert_snapshot!(String::from_utf8(out).unwrap(), @r###"
        {
          "equal": true
        }
        "###);

        let mut out = Vec::new();
        let code = do_compare(
            &Compare {
                desired,
                observed: drifted,
            },
            &mut out,
        )
        .unwrap();

        assert_eq!(code, EXIT_DRIFTED);
        insta::assert_snapshot!(String::from_utf8(out).unwrap(), @r###"
        {
          "equal": false,
          "mismatch": {
            "field": "condition_count",
            "left": 1,
            "right": 2
          }
        }
        "###);
    }

    #[test]
    fn test_compare_rejects_two_stdin_documents() {
        let err = do_compare(
            &Compare {
                desired: "-".to_string(),
                observed: "-".to_string(),
            },
            &mut Vec::new(),
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "at most one of --desired and --observed may read from stdin"
        );
    }

    #[test]
    fn test_fingerprint_lines() {
        let dir = tempfile::tempdir().unwrap();
        let spec = PolicySpec::example();
        let path = write_doc(&dir, "policy.yaml", &spec);

        let mut out = Vec::new();
        do_fingerprint(&Fingerprint { path }, &mut out).unwrap();

        let expect = format!(
            "0\t{}\tNRQL Condition\n",
            drift::fingerprint(&spec.conditions[0].spec)
        );
        assert_eq!(String::from_utf8(out).unwrap(), expect);
    }

    #[test]
    fn test_cli_parses() {
        use clap::Parser;

        let cli = Cli::try_parse_from([
            "policyctl",
            "compare",
            "--desired",
            "a.yaml",
            "--observed",
            "b.yaml",
        ])
        .unwrap();

        let Command::Compare(compare) = cli.cmd else {
            panic!("expected compare");
        };
        assert_eq!(compare.desired, "a.yaml");
        assert_eq!(compare.observed, "b.yaml");

        assert!(Cli::try_parse_from(["policyctl", "json-schema"]).is_ok());
    }
}
