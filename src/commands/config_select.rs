use crate::core::{
    is_affirmative, print_error, print_info, print_rule, print_section_header, print_success,
    print_warning, ConfigFile, ConfigSection, Configuration, Prompter, Result, Settings,
    TaskflowError,
};
use std::path::Path;

const RULE_WIDTH: usize = 60;

/// Loads the configuration file, lets the user pick a section and a
/// configuration in it, and asks for confirmation.
pub fn get_full_config_flow(
    path: &Path,
    settings: &Settings,
    prompter: &dyn Prompter,
) -> Result<Configuration> {
    print_info(&format!("Configuration file: {}", path.display()));
    let file = ConfigFile::load(path)?;
    log::debug!("Loaded {} section(s) from {}", file.sections.len(), path.display());

    let (section_key, section) = select_section(&file, prompter)?;
    let config = select_config_from_section(section_key, section, settings, prompter)?;

    show_selected_config(&config);
    let answer = prompter.ask("Is the selected configuration correct? [y/N]:")?;
    if !is_affirmative(&answer) {
        return Err(TaskflowError::ConfigNotConfirmed);
    }
    Ok(config)
}

fn select_section<'f>(
    file: &'f ConfigFile,
    prompter: &dyn Prompter,
) -> Result<(&'f str, &'f ConfigSection)> {
    let sections: Vec<(&String, &ConfigSection)> = file.sections.iter().collect();

    print_section_header("Available sections");
    for (i, (_, section)) in sections.iter().enumerate() {
        print_info(&format!("{}. {}", i + 1, section.description));
        print_info(&format!("   └─ {} configuration(s)", section.configs.len()));
    }
    print_rule(RULE_WIDTH);

    loop {
        let choice = prompter.ask("Select the section number:")?;
        match choice.parse::<usize>() {
            Ok(n) if (1..=sections.len()).contains(&n) => {
                let (key, section) = sections[n - 1];
                print_success(&format!("Section selected: {}", section.description));
                return Ok((key.as_str(), section));
            }
            Ok(_) => print_error("Invalid number. Try again."),
            Err(_) => print_error("Enter a valid number."),
        }
    }
}

fn select_config_from_section(
    section_key: &str,
    section: &ConfigSection,
    settings: &Settings,
    prompter: &dyn Prompter,
) -> Result<Configuration> {
    if section.configs.is_empty() {
        print_warning("There are no configurations in this section.");
        return Err(TaskflowError::empty_section(section_key));
    }

    print_section_header(&format!("Configurations in: {}", section.description));
    for config in &section.configs {
        print_info(&format!("{}. {}", config.number, config.name));
        print_info(&format!("   ID: {}", config.id));
        print_info(&format!("   Project: {}", config.project.as_deref().unwrap_or("None")));
        print_info(&format!("   Task: {}", config.task.as_deref().unwrap_or("None")));
        print_info(&format!(
            "   Base: {} → Feature: {}",
            config.base_branch.as_deref().unwrap_or("None"),
            config.feature_branch.as_deref().unwrap_or("None")
        ));
    }
    print_rule(RULE_WIDTH);

    let description = if section.description.is_empty() {
        section_key
    } else {
        section.description.as_str()
    };

    loop {
        let choice = prompter.ask("Select the configuration number:")?;
        let Ok(number) = choice.parse::<u32>() else {
            print_error("Enter a valid number.");
            continue;
        };
        match section.find(number) {
            Some(record) => {
                return Configuration::from_record(record, description, &settings.base_path)
            }
            None => print_error(&format!("No configuration with number '{number}'")),
        }
    }
}

fn show_selected_config(config: &Configuration) {
    print_section_header("Selected configuration");
    print_info(&format!("Name: {}", config.name));
    print_info(&format!("Project: {}", config.project.as_deref().unwrap_or("None")));
    print_info(&format!("Section: {}", config.section.as_deref().unwrap_or("None")));
    print_info(&format!("Task: {}", config.task.as_deref().unwrap_or("None")));
    print_info(&format!("Repo: {}", config.repo_path.display()));
    print_info(&format!(
        "Base branch: {} | Feature branch: {}",
        config.base_branch.as_deref().unwrap_or("None"),
        config.feature_branch.as_deref().unwrap_or("None")
    ));
}
