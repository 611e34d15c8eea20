//! End-to-end override reconciliation over real C# sources.

use std::fs;
use std::path::Path;

use porter_core::pipeline::{rewrite_files_parallel, rewrite_source, rewrite_text};
use porter_core::{ApiModel, PorterError, RuleTable, SourceFile};
use tempfile::tempdir;

const API_TOML: &str = r#"
[types.ModType]

[[types.ModType.methods]]
name = "Load"

[types.ModItem]
base = "ModType"

[[types.ModItem.methods]]
name = "Update"
returns = "void"
parameters = [{ name = "dt", type = "double" }]

[[types.ModItem.methods]]
name = "CanUse"
accessibility = "protected"
returns = "bool"
parameters = [{ name = "player", type = "Player" }]

[[types.ModItem.methods]]
name = "ModifyTooltips"
parameters = [{ name = "lines", type = "List<TooltipLine>" }]

[[types.ModItem.properties]]
name = "Scale"
type = "double"

[[types.ModItem.properties]]
name = "Label"
accessibility = "protected"
type = "string"
"#;

const RULES_TOML: &str = r#"
[[signature_change]]
type = "ModItem"
member = "Update"
note = "Update now takes a double"

[[signature_change]]
type = "ModItem"
member = "CanUse"

[[signature_change]]
type = "ModItem"
member = "Scale"
note = "Scale is a double"

[[signature_change]]
type = "ModItem"
member = "Label"

[[signature_change]]
type = "ModItem"
member = "Draw"
note = "Draw changed"

[[removed]]
type = "ModItem"
member = "OldHook"
note = "Use Update instead"
"#;

const STALE_ITEM: &str = r#"using System.Collections.Generic;
using Terraria;
using Terraria.ModLoader;

namespace ExampleMod.Items
{
    public class MyItem : ModItem
    {
        private int timer;

        [Obsolete] // keep
        public override void Update(float dt) // tick
        {
            timer++;
        }

        public override bool CanUse(Player player) => true;

        public override float Scale => 1f;

        public override object Label => "label";

        public override void OldHook() { }

        public override void ModifyTooltips(string[] lines) { }

        public override void Draw(int layer) { }

        public void Helper(float dt) { }
    }
}
"#;

const FIXED_ITEM: &str = r#"using System.Collections.Generic;
using Terraria;
using Terraria.ModLoader;

namespace ExampleMod.Items
{
    public class MyItem : ModItem
    {
        private int timer;

        [Obsolete] // keep
        public override void Update(double dt) /* Update now takes a double */ // tick
        {
            timer++;
        }

        protected override bool CanUse(Player player) => true;

        public override double Scale /* Scale is a double */ => 1f;

        protected override string Label => "label";

        public override void OldHook() /* Note: Removed. Use Update instead */ { }

        public override void ModifyTooltips(string[] lines) { }

        public override void Draw(int layer) { }

        public void Helper(float dt) { }
    }
}
"#;

fn api() -> ApiModel {
    ApiModel::from_toml_str(API_TOML).expect("api fixture")
}

fn rules() -> RuleTable {
    RuleTable::from_toml_str(RULES_TOML).expect("rules fixture")
}

fn rewrite(source: &str) -> String {
    rewrite_text(source, "csharp", &api(), &rules()).expect("rewrite")
}

#[test]
fn test_stale_overrides_are_reconciled() {
    assert_eq!(rewrite(STALE_ITEM), FIXED_ITEM);
}

#[test]
fn test_rewrite_is_idempotent() {
    let once = rewrite(STALE_ITEM);
    let twice = rewrite(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_up_to_date_overrides_untouched() {
    let source = r#"class MyItem : ModItem
{
    public override void Update(double dt) { }
    protected override bool CanUse(Player player) => false;
    public override System.Double Scale { get => 2; }
}
"#;
    assert_eq!(rewrite(source), source);
}

#[test]
fn test_non_override_pass_through() {
    let source = "class MyItem : ModItem\n{\n    public void Update(float dt) { }\n    public float Scale => 1f;\n}\n";
    assert_eq!(rewrite(source), source);
}

#[test]
fn test_no_rule_pass_through() {
    let source = "class MyItem : ModItem\n{\n    public override void ModifyTooltips(string[] lines)\n    {\n    }\n}\n";
    assert_eq!(rewrite(source), source);
}

#[test]
fn test_unrelated_type_pass_through() {
    // Same member name, but the class doesn't derive from ModItem.
    let source = "class Other : ModType\n{\n    public override void Update(float dt) { }\n}\n";
    assert_eq!(rewrite(source), source);
}

#[test]
fn test_inherited_rule_through_source_types() {
    let source = r#"namespace ExampleMod;

public class BaseWeapon : ModItem
{
}

public class Sword : BaseWeapon
{
    protected override void Update(float dt) => base.Update(dt);
}
"#;
    let expected = r#"namespace ExampleMod;

public class BaseWeapon : ModItem
{
}

public class Sword : BaseWeapon
{
    public override void Update(double dt) /* Update now takes a double */ => base.Update(dt);
}
"#;
    assert_eq!(rewrite(source), expected);
}

#[test]
fn test_nested_types_use_their_own_base() {
    let source = r#"class Outer
{
    class Inner : ModItem
    {
        internal override float Scale { get; set; }
    }

    public override float Scale { get; set; }
}
"#;
    let expected = r#"class Outer
{
    class Inner : ModItem
    {
        public override double Scale /* Scale is a double */ { get; set; }
    }

    public override float Scale { get; set; }
}
"#;
    assert_eq!(rewrite(source), expected);
}

const SHAPE_API_TOML: &str = r#"
[types.ModItem]

[[types.ModItem.methods]]
name = "Slot"
returns = "ref int"

[[types.ModItem.methods]]
name = "Bounds"
returns = "(int width, int height)"

[[types.ModItem.methods]]
name = "Update"
parameters = [{ name = "dt", type = "double" }]
"#;

const SHAPE_RULES_TOML: &str = r#"
[[signature_change]]
type = "ModItem"
member = "Slot"
note = "Slot returns by reference"

[[signature_change]]
type = "ModItem"
member = "Bounds"
note = "Bounds returns ints"

[[signature_change]]
type = "ModItem"
member = "Update"
note = "Update now takes a double"
"#;

fn rewrite_shapes(source: &str) -> String {
    let api = ApiModel::from_toml_str(SHAPE_API_TOML).expect("api fixture");
    let rules = RuleTable::from_toml_str(SHAPE_RULES_TOML).expect("rules fixture");
    rewrite_text(source, "csharp", &api, &rules).expect("rewrite")
}

#[test]
fn test_ref_return_up_to_date() {
    let source = "class MyItem : ModItem\n{\n    public override ref int Slot() => ref x;\n}\n";
    assert_eq!(rewrite_shapes(source), source);
}

#[test]
fn test_tuple_return_rewritten_with_spacing() {
    let source = "class MyItem : ModItem\n{\n    public override (float w, float h) Bounds() { }\n}\n";
    let expected = "class MyItem : ModItem\n{\n    public override (int width, int height) Bounds() /* Bounds returns ints */ { }\n}\n";
    let once = rewrite_shapes(source);
    assert_eq!(once, expected);
    assert_eq!(rewrite_shapes(&once), expected);
}

#[test]
fn test_tuple_element_names_ignored_for_identity() {
    let source = "class MyItem : ModItem\n{\n    public override (int w, int h) Bounds() { }\n}\n";
    assert_eq!(rewrite_shapes(source), source);
}

#[test]
fn test_partial_class_base_from_other_declaration() {
    let source = r#"partial class MyItem : ModItem
{
}

partial class MyItem
{
    public override void Update(float dt) { }
}
"#;
    let expected = r#"partial class MyItem : ModItem
{
}

partial class MyItem
{
    public override void Update(double dt) /* Update now takes a double */ { }
}
"#;
    assert_eq!(rewrite_shapes(source), expected);
}

#[test]
fn test_ambiguous_rules_fail() {
    let mut builder = RuleTable::builder();
    builder
        .declare_signature_change("ModType", "Update", None)
        .declare_signature_change("ModItem", "Update", Some("Update now takes a double"));
    let rules = builder.build().expect("distinct declaring types build");

    let err = rewrite_text(STALE_ITEM, "csharp", &api(), &rules).unwrap_err();
    assert!(matches!(err, PorterError::AmbiguousRule { .. }));

    let file = SourceFile::from_path_and_source("MyItem.cs", STALE_ITEM);
    let result = rewrite_source(&file, &api(), &rules);
    assert!(!result.success);
    assert!(result.error.unwrap().contains("Ambiguous"));
}

#[test]
fn test_duplicate_rules_fail_before_rewriting() {
    let err = RuleTable::from_toml_str(
        r#"
[[signature_change]]
type = "ModItem"
member = "Update"

[[signature_change]]
type = "ModItem"
member = "Update"
note = "again"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, PorterError::DuplicateRule { .. }));
}

#[test]
fn test_parallel_rewrite_matches_sequential() {
    let files = vec![
        SourceFile::from_path_and_source("Items/MyItem.cs", STALE_ITEM),
        SourceFile::from_path_and_source("Items/Plain.cs", "class Plain { }\n"),
        SourceFile::new("Items/Broken.txt".to_string(), "x".to_string(), "cobol".to_string()),
    ];

    let results = rewrite_files_parallel(&files, &api(), &rules(), None);
    assert_eq!(results.len(), 3);

    assert!(results[0].success);
    assert!(results[0].changed);
    assert_eq!(results[0].source.as_deref(), Some(FIXED_ITEM));

    assert!(results[1].success);
    assert!(!results[1].changed);

    assert!(!results[2].success);
    assert!(results[2].error.as_deref().unwrap_or("").contains("cobol"));
}

#[test]
fn test_rule_table_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RuleTable>();
    assert_send_sync::<ApiModel>();
}

#[test]
fn test_load_configuration_from_disk() {
    let dir = tempdir().expect("Failed to create temp dir");

    let api_path = dir.path().join("api.toml");
    let rules_path = dir.path().join("rules.toml");
    fs::write(&api_path, API_TOML).unwrap();
    fs::write(&rules_path, RULES_TOML).unwrap();

    let api = ApiModel::from_path(&api_path).unwrap();
    let rules = RuleTable::from_path(&rules_path).unwrap();
    assert_eq!(rules.len(), 6);
    assert_eq!(
        rewrite_text(STALE_ITEM, "cs", &api, &rules).unwrap(),
        FIXED_ITEM
    );

    let json_path = dir.path().join("api.json");
    fs::write(&json_path, serde_json_fixture()).unwrap();
    let from_json = ApiModel::from_path(&json_path).unwrap();
    assert!(from_json.get_type("ModItem").is_some());

    let yaml_path = dir.path().join("api.yaml");
    fs::write(&yaml_path, "types: {}").unwrap();
    assert!(matches!(
        ApiModel::from_path(&yaml_path),
        Err(PorterError::UnsupportedFormat { .. })
    ));

    assert!(matches!(
        RuleTable::from_path(Path::new("/nonexistent/rules.toml")),
        Err(PorterError::Io(_))
    ));
}

fn serde_json_fixture() -> &'static str {
    r#"{
  "types": {
    "ModItem": {
      "base": "ModType",
      "methods": [
        { "name": "Update", "parameters": [{ "name": "dt", "type": "double" }] }
      ]
    }
  }
}"#
}
