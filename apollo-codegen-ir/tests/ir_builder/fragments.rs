use apollo_codegen_ir::IrBuilder;
use apollo_codegen_ir::IrConfig;
use apollo_codegen_ir::ir::IntermediateRepresentation;
use apollo_codegen_ir::ir::IrNamedFragment;
use apollo_codegen_ir::ir::IrTypeKind;
use apollo_codegen_ir::ir::ModelPathRoot;
use pretty_assertions::assert_eq;

use super::build;
use super::field;
use super::operation;
use super::response_names;
use super::schema;
use super::unvalidated_document;

fn fragment<'a>(ir: &'a IntermediateRepresentation, name: &str) -> &'a IrNamedFragment {
    ir.all_named_fragments
        .iter()
        .find(|fragment| fragment.name.as_str() == name)
        .unwrap_or_else(|| panic!("no fragment `{name}`"))
}

#[test]
fn fragment_has_a_data_field_on_its_type_condition() {
    let ir = build(
        r#"
        fragment HeroDetails on Character {
          name
          ... on Droid {
            primaryFunction
          }
        }
        "#,
    );
    assert!(ir.operations.is_empty());
    let details = fragment(&ir, "HeroDetails");
    assert_eq!(details.type_condition.as_str(), "Character");
    assert_eq!(details.file_path, "operations.graphql");
    assert!(details.variables.is_empty());
    assert_eq!(details.data_field.ty.to_string(), "Character");
    assert!(!details.data_field.ty.is_non_null());
    assert_eq!(details.data_field.ty.leaf().kind(), IrTypeKind::Object);
    assert_eq!(details.data_field.field_sets.len(), 2);

    let path = details.data_field.field_sets[0].full_path();
    assert_eq!(path.root(), ModelPathRoot::Fragment);
    assert_eq!(path.file_name(), "HeroDetails");
}

#[test]
fn shapes_implement_the_fragments_they_spread() {
    let ir = build(
        r#"
        query Hero {
          hero {
            ...HeroName
            friends {
              name
            }
            ...HumanHeight
          }
        }

        fragment HeroName on Character {
          name
        }

        fragment HumanHeight on Human {
          height
        }
        "#,
    );
    let hero = field(&operation(&ir, "Hero").data_field, &["hero"]);
    let hero_name = fragment(&ir, "HeroName").data_field.field_sets[0].full_path();
    let human_height = fragment(&ir, "HumanHeight").data_field.field_sets[0].full_path();

    let base = hero.base_field_set().unwrap();
    assert_eq!(response_names(&base.fields), ["name", "friends"]);
    assert!(base.implements.contains(&hero_name));
    assert!(!base.implements.contains(&human_height));
    assert!(base.field("name").unwrap().is_override);
    assert!(!base.field("friends").unwrap().is_override);

    let human = hero.field_set_for_concrete_type("Human").unwrap();
    assert_eq!(human.type_set.to_string(), "{Character, Human}");
    assert_eq!(response_names(&human.fields), ["name", "friends", "height"]);
    assert!(human.implements.contains(&hero_name));
    assert!(human.implements.contains(&human_height));
    assert!(
        human
            .implements
            .contains(&base.full_path().with_root(ModelPathRoot::OperationInterface))
    );
}

#[test]
fn fragment_variables_are_inferred() {
    let ir = build(
        r#"
        query Hero($withFriends: Boolean!, $unit: LengthUnit) {
          hero {
            ...HeroFriends
          }
        }

        fragment HeroFriends on Character {
          friends @include(if: $withFriends) {
            ... on Human {
              height(unit: $unit)
            }
          }
        }
        "#,
    );
    let friends = fragment(&ir, "HeroFriends");
    let variables: Vec<(String, String)> = friends
        .variables
        .iter()
        .map(|variable| (variable.name.to_string(), variable.ty.to_string()))
        .collect();
    assert_eq!(
        variables,
        [
            ("withFriends".to_owned(), "Boolean!".to_owned()),
            ("unit".to_owned(), "LengthUnit".to_owned()),
        ]
    );
    assert!(
        friends
            .variables
            .iter()
            .all(|variable| variable.default_value.is_none())
    );
    assert_eq!(
        field(&friends.data_field, &["friends"]).condition.to_string(),
        "$withFriends"
    );
}

#[test]
fn metadata_fragments_are_available_but_not_generated() {
    let schema = schema();
    let operations = unvalidated_document(
        &schema,
        r#"
        query Ship {
          starship(id: "3000") {
            ...StarshipFields
          }
        }

        fragment HeroName on Character {
          id
          name
        }
        "#,
        "operations.graphql",
    );
    let upstream = unvalidated_document(
        &schema,
        r#"
        query Upstream {
          hero {
            name
          }
        }

        fragment StarshipFields on Starship {
          id
          name
        }

        fragment HeroName on Character {
          name
        }
        "#,
        "upstream.graphql",
    );
    let ir = IrBuilder::new(&schema, IrConfig::default())
        .document(&operations)
        .metadata_document(&upstream)
        .build()
        .unwrap();

    let operation_names: Vec<&str> = ir
        .operations
        .iter()
        .map(|operation| operation.name.as_str())
        .collect();
    assert_eq!(operation_names, ["Ship"]);

    let generated: Vec<&str> = ir
        .named_fragments_to_generate
        .iter()
        .map(|name| name.as_str())
        .collect();
    assert_eq!(generated, ["HeroName"]);
    let available: Vec<&str> = ir
        .all_named_fragments
        .iter()
        .map(|fragment| fragment.name.as_str())
        .collect();
    assert_eq!(available, ["HeroName", "StarshipFields"]);
    assert!(generated.iter().all(|name| available.contains(name)));

    let hero_name = fragment(&ir, "HeroName");
    assert_eq!(hero_name.file_path, "operations.graphql");
    assert_eq!(
        response_names(&hero_name.data_field.field_sets[0].fields),
        ["id", "name"]
    );
    assert_eq!(fragment(&ir, "StarshipFields").file_path, "upstream.graphql");
    assert!(
        operation(&ir, "Ship")
            .source_with_fragments
            .contains("fragment StarshipFields on Starship {")
    );
}
