use apollo_codegen_ir::IrBuilder;
use apollo_codegen_ir::IrConfig;
use apollo_codegen_ir::ir::IntermediateRepresentation;
use apollo_codegen_ir::ir::IrValue;
use pretty_assertions::assert_eq;

use super::build;
use super::schema;
use super::unvalidated_document;

fn names(ir: &IntermediateRepresentation) -> [Vec<&str>; 3] {
    [
        ir.input_objects
            .iter()
            .map(|input_object| input_object.name.as_str())
            .collect(),
        ir.enums.iter().map(|enum_| enum_.name.as_str()).collect(),
        ir.custom_scalars
            .iter()
            .map(|scalar| scalar.name.as_str())
            .collect(),
    ]
}

fn build_with_config(source: &str, config: IrConfig) -> IntermediateRepresentation {
    let schema = schema();
    let document = unvalidated_document(&schema, source, "operations.graphql");
    IrBuilder::new(&schema, config)
        .document(&document)
        .build()
        .unwrap()
}

#[test]
fn only_used_types_are_generated() {
    let ir = build(
        r#"
        query Hero {
          hero {
            id
            name
            ... on Human {
              height
            }
          }
        }
        "#,
    );
    let [input_objects, enums, custom_scalars] = names(&ir);
    assert!(input_objects.is_empty());
    assert!(enums.is_empty());
    assert!(custom_scalars.is_empty());
}

#[test]
fn used_input_objects_pull_in_their_field_types() {
    let ir = build(
        r#"
        mutation CreateReview($episode: Episode) {
          createReview(episode: $episode, review: {stars: 5, commentary: "Great"}) {
            stars
            createdAt
          }
        }
        "#,
    );
    assert_eq!(
        names(&ir),
        [
            vec!["ReviewInput", "ColorInput"],
            vec!["Episode"],
            vec!["Date"]
        ]
    );

    let review_input = &ir.input_objects[0];
    assert_eq!(
        review_input.description.as_deref(),
        Some("The input object sent when someone is creating a new review")
    );
    let fields: Vec<(&str, String)> = review_input
        .fields
        .iter()
        .map(|field| (field.name.as_str(), field.ty.to_string()))
        .collect();
    assert_eq!(
        fields,
        [
            ("stars", "Int!".to_owned()),
            ("commentary", "String".to_owned()),
            ("favoriteColor", "ColorInput".to_owned()),
        ]
    );

    let episode = &ir.enums[0];
    assert_eq!(
        episode.description.as_deref(),
        Some("The episodes in the Star Wars trilogy")
    );
    let values: Vec<&str> = episode
        .values
        .iter()
        .map(|value| value.name.as_str())
        .collect();
    assert_eq!(values, ["NEWHOPE", "EMPIRE", "JEDI"]);
    assert_eq!(
        ir.custom_scalars[0].description.as_deref(),
        Some("An ISO-8601 encoded date")
    );
}

#[test]
fn unused_fragments_still_count() {
    let ir = build(
        r#"
        fragment ReviewDates on Review {
          createdAt
        }

        fragment ShipLength on Starship {
          length(unit: FOOT)
        }
        "#,
    );
    let [input_objects, enums, custom_scalars] = names(&ir);
    assert!(input_objects.is_empty());
    assert_eq!(enums, ["LengthUnit"]);
    assert_eq!(custom_scalars, ["Date"]);

    let foot = &ir.enums[0].values[1];
    assert_eq!(foot.name.as_str(), "FOOT");
    assert_eq!(foot.deprecation_reason.as_deref(), Some("No longer supported"));
    assert_eq!(ir.enums[0].values[0].deprecation_reason, None);
}

#[test]
fn configured_types_are_always_generated() {
    let config = IrConfig::new(["Color", "Unused", "Review.*"]).unwrap();
    let ir = build_with_config("query Hero { hero { name } }", config);
    assert_eq!(
        names(&ir),
        [
            vec!["ReviewInput", "ColorInput", "ReviewFilter"],
            vec!["Color"],
            vec!["Unused"]
        ]
    );

    let filter = &ir.input_objects[2];
    let defaults: Vec<Option<IrValue>> = filter
        .fields
        .iter()
        .map(|field| field.default_value.clone())
        .collect();
    assert_eq!(
        defaults,
        [Some(IrValue::Int(0)), Some(IrValue::Float(1.0))]
    );
}

#[test]
fn patterns_must_match_whole_type_names() {
    let config = IrConfig::new(["Col", "Episod."]).unwrap();
    let ir = build_with_config("query Hero { hero { name } }", config);
    assert_eq!(names(&ir), [vec![], vec!["Episode"], vec![]]);
}
