//! Example settings document printed by the `example` command.

/// A commented example settings file.
pub const EXAMPLE_CONFIG: &str = r#"# tf-plan-reporter example config file
terraform_binary_file: /usr/bin/terraform     # Absolute, relative or bare (looked up on PATH) terraform command. MANDATORY
terraform_plan_file_basename: plan.bin        # Base name of terraform binary plan files to search for. MANDATORY
terraform_plan_search_folder: .               # Common parent folder where the search of plan files starts. MANDATORY

# Cloud resource types which must be kept. Either the single item "all", and then
# "allowed_removals" lists what may be removed, or particular resource types which
# must be kept from accidental removal (then "allowed_removals" must be empty).
critical_resources:
  - all

allowed_removals:                             # Makes sense only if "all" is specified in "critical_resources"
  - null_resource
  - azurerm_role_assignment
  - azurerm_monitor_diagnostic_setting
  - azurerm_key_vault

not_use_chdir: false                          # Whether the '-chdir=DIR' argument of 'terraform' is NOT used.
                                              # terraform + terragrunt workspaces: keep 'false'.
                                              # plain terraform with .terraform/providers in the current folder: 'true'.
"#;
