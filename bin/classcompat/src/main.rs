use classcompat::resolve::{CachingResolver, CompositeResolver, DirectoryResolver, Resolver};
use classcompat::verify::{
    verify_classes, ArtifactId, ExternalClasses, IgnoreCondition, IgnoredProblemsFilter,
    VerificationContext, VerifierPipeline,
};

use clap::{crate_version, Arg, ArgAction, Command};
use std::collections::BTreeMap;
use std::fs;
use std::process;
use std::sync::Arc;

fn main() {
    env_logger::init();

    let matches = Command::new("classcompat")
        .version(crate_version!())
        .about("Check JVM class files for binary-compatibility problems")
        .arg(
            Arg::new("artifact-id")
                .long("artifact-id")
                .value_name("ID")
                .default_value("artifact")
                .help("Identifier of the verified artifact (used by ignore conditions)"),
        )
        .arg(
            Arg::new("artifact-version")
                .long("artifact-version")
                .value_name("VERSION")
                .default_value("unspecified")
                .help("Version of the verified artifact (used by ignore conditions)"),
        )
        .arg(
            Arg::new("platform")
                .long("platform")
                .value_name("DIR")
                .action(ArgAction::Append)
                .help("Directory of platform classes the artifact compiles against (repeatable)"),
        )
        .arg(
            Arg::new("external")
                .long("external")
                .value_name("PREFIX")
                .action(ArgAction::Append)
                .help("Package prefix of classes supplied by the runtime (repeatable; defaults to the JDK packages)"),
        )
        .arg(
            Arg::new("ignore-file")
                .long("ignore-file")
                .value_name("FILE")
                .help("File of `artifact:version:pattern` ignore conditions, one per line"),
        )
        .arg(
            Arg::new("ARTIFACT")
                .help("Directory of the class files to verify")
                .required(true)
                .index(1),
        )
        .get_matches();

    let artifact_dir = matches.get_one::<String>("ARTIFACT").unwrap();
    let artifact = ArtifactId::new(
        matches.get_one::<String>("artifact-id").unwrap().clone(),
        matches.get_one::<String>("artifact-version").unwrap().clone(),
    );

    let artifact_resolver = match DirectoryResolver::open(artifact_dir) {
        Ok(resolver) => resolver,
        Err(err) => {
            log::error!("Cannot open artifact directory '{}': {}", artifact_dir, err);
            process::exit(2);
        }
    };
    let class_names = artifact_resolver.class_names();

    let mut constituents: Vec<Arc<dyn Resolver>> = vec![Arc::new(artifact_resolver)];
    for platform_dir in matches.get_many::<String>("platform").into_iter().flatten() {
        match DirectoryResolver::open(platform_dir) {
            Ok(resolver) => constituents.push(Arc::new(resolver)),
            Err(err) => {
                log::error!("Cannot open platform directory '{}': {}", platform_dir, err);
                process::exit(2);
            }
        }
    }

    let externals = match matches.get_many::<String>("external") {
        Some(prefixes) => match ExternalClasses::new(prefixes) {
            Ok(externals) => externals,
            Err(err) => {
                log::error!("{}", err);
                process::exit(2);
            }
        },
        None => ExternalClasses::jdk_defaults(),
    };

    let resolver = Arc::new(CachingResolver::new(CompositeResolver::new(constituents)));
    let mut context = VerificationContext::new(artifact, resolver, externals);

    if let Some(ignore_file) = matches.get_one::<String>("ignore-file") {
        match load_ignore_file(ignore_file) {
            Ok(filter) => context.add_filter(Box::new(filter)),
            Err(err) => {
                log::error!("{}", err);
                process::exit(2);
            }
        }
    }

    log::info!("Verifying {} classes", class_names.len());
    verify_classes(&context, &VerifierPipeline::standard(), &class_names);

    let deprecated = context.deprecated_usages();
    if !deprecated.is_empty() {
        println!("Deprecated API usage ({})", deprecated.len());
        for usage in &deprecated {
            println!("  {}", usage.full_description());
        }
    }

    let problems = context.problems();
    if problems.is_empty() {
        println!("No compatibility problems found");
        return;
    }

    let mut by_type: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
    for problem in &problems {
        by_type
            .entry(problem.problem_type())
            .or_insert_with(Vec::new)
            .push(problem.full_description());
    }
    for (problem_type, descriptions) in &by_type {
        println!("{} ({})", problem_type, descriptions.len());
        for description in descriptions {
            println!("  {}", description);
        }
    }
    println!("Found {} compatibility problems", problems.len());
    process::exit(1);
}

/// Read ignore conditions from a file, one condition per line
///
/// Blank lines and lines starting with `#` are skipped.
fn load_ignore_file(path: &str) -> Result<IgnoredProblemsFilter, String> {
    let contents =
        fs::read_to_string(path).map_err(|err| format!("Cannot read '{}': {}", path, err))?;
    let mut conditions = vec![];
    for (line_number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let condition = IgnoreCondition::parse(line)
            .map_err(|err| format!("{}:{}: {}", path, line_number + 1, err))?;
        conditions.push(condition);
    }
    Ok(IgnoredProblemsFilter::new(conditions))
}
