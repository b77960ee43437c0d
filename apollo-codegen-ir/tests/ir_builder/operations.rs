use apollo_codegen_ir::IrBuilder;
use apollo_codegen_ir::IrConfig;
use apollo_codegen_ir::error::CoercionError;
use apollo_codegen_ir::error::IrError;
use apollo_codegen_ir::error::UserQueryError;
use apollo_codegen_ir::ir::IrOperationType;
use apollo_codegen_ir::ir::IrTypeKind;
use apollo_codegen_ir::ir::IrValue;
use apollo_compiler::Node;
use apollo_compiler::ast;
use apollo_compiler::executable;
use apollo_compiler::name;
use pretty_assertions::assert_eq;

use super::build;
use super::document;
use super::field;
use super::operation;
use super::schema;
use super::try_build;

#[test]
fn operation_has_a_synthetic_data_field() {
    let ir = build(
        r#"
        query Hero {
          hero {
            name
          }
        }

        mutation CreateReview($episode: Episode) {
          createReview(episode: $episode, review: {stars: 5}) {
            stars
          }
        }
        "#,
    );
    let hero = operation(&ir, "Hero");
    assert_eq!(hero.operation_type, IrOperationType::Query);
    assert_eq!(hero.type_condition.as_str(), "Query");
    assert_eq!(hero.file_path, "operations.graphql");
    assert!(hero.variables.is_empty());

    let data = &hero.data_field;
    assert_eq!(data.name.as_str(), "data");
    assert_eq!(data.alias, None);
    assert!(data.arguments.is_empty());
    assert!(data.condition.is_true());
    assert_eq!(data.ty.to_string(), "Query");
    assert_eq!(data.ty.leaf().kind(), IrTypeKind::Object);
    assert_eq!(data.field_sets.len(), 1);

    let create_review = operation(&ir, "CreateReview");
    assert_eq!(create_review.operation_type, IrOperationType::Mutation);
    assert_eq!(create_review.type_condition.as_str(), "Mutation");
    assert_eq!(create_review.data_field.ty.to_string(), "Mutation");
}

#[test]
fn variable_defaults_are_coerced() {
    let ir = build(
        r#"
        query Reviews($ratio: Float = 3, $episode: Episode! = JEDI) {
          reviews(episode: $episode, filter: {ratio: $ratio}) {
            stars
          }
        }
        "#,
    );
    let variables: Vec<(String, String, Option<IrValue>)> = operation(&ir, "Reviews")
        .variables
        .iter()
        .map(|variable| {
            (
                variable.name.to_string(),
                variable.ty.to_string(),
                variable.default_value.clone(),
            )
        })
        .collect();
    assert_eq!(
        variables,
        [
            (
                "ratio".to_owned(),
                "Float".to_owned(),
                Some(IrValue::Float(3.0))
            ),
            (
                "episode".to_owned(),
                "Episode!".to_owned(),
                Some(IrValue::Enum(name!("JEDI")))
            ),
        ]
    );
}

#[test]
fn arguments_are_coerced_against_their_definitions() {
    let ir = build(
        r#"
        query Ships {
          starship(id: 2001) {
            length(unit: FOOT)
            coordinates
          }
          reviews(episode: JEDI, filter: {ratio: 4, minStars: 2}) {
            stars
          }
        }
        "#,
    );
    let data = &operation(&ir, "Ships").data_field;

    let starship = field(data, &["starship"]);
    assert_eq!(starship.arguments[0].value, IrValue::String("2001".to_owned()));
    assert_eq!(starship.arguments[0].ty.to_string(), "ID!");

    let length = field(data, &["starship", "length"]);
    assert_eq!(length.arguments.len(), 1);
    assert_eq!(length.arguments[0].value, IrValue::Enum(name!("FOOT")));
    assert_eq!(
        length.arguments[0].default_value,
        Some(IrValue::Enum(name!("METER")))
    );
    assert_eq!(
        field(data, &["starship", "coordinates"]).ty.to_string(),
        "[[Float!]!]"
    );

    let reviews = field(data, &["reviews"]);
    let arguments: Vec<String> = reviews
        .arguments
        .iter()
        .map(|argument| format!("{}: {}", argument.name, argument.value))
        .collect();
    assert_eq!(
        arguments,
        ["episode: JEDI", "filter: {ratio: 4.0, minStars: 2}"]
    );
    assert_eq!(reviews.arguments[1].default_value, None);
}

#[test]
fn duplicate_input_object_field_is_rejected() {
    let error = try_build(
        r#"
        mutation CreateReview {
          createReview(review: {stars: 1, stars: 2}) {
            stars
          }
        }
        "#,
    )
    .unwrap_err();
    assert_eq!(
        error,
        IrError::Coercion(CoercionError::DuplicateInputField {
            input_object: name!("ReviewInput"),
            field: name!("stars"),
        })
    );
}

#[test]
fn anonymous_operation_is_rejected() {
    let schema = schema();
    let document = document(&schema, "{ hero { name } }");
    let error = IrBuilder::new(&schema, IrConfig::default())
        .document(&document)
        .build()
        .unwrap_err();
    assert_eq!(error, IrError::UserQuery(UserQueryError::AnonymousOperation));
}

#[test]
fn operation_without_a_root_type_is_rejected() {
    let schema = schema();
    let mut document = document(&schema, "query Hero { hero { name } }");
    // The schema has no subscription root, so such operations only exist when built by hand.
    document.operations.named.insert(
        name!("Watch"),
        Node::new(executable::Operation {
            operation_type: executable::OperationType::Subscription,
            name: Some(name!("Watch")),
            variables: Vec::new(),
            directives: ast::DirectiveList(Vec::new()),
            selection_set: executable::SelectionSet::new(name!("Subscription")),
        }),
    );
    let error = IrBuilder::new(&schema, IrConfig::default())
        .document(&document)
        .build()
        .unwrap_err();
    assert_eq!(
        error,
        IrError::MissingRootType {
            operation: name!("Watch"),
            operation_type: IrOperationType::Subscription,
        }
    );
    assert_eq!(
        error.to_string(),
        "cannot find the root type for subscription `Watch`"
    );
}

#[test]
fn source_includes_transitively_used_fragments() {
    let ir = build(
        r#"
        query Hero($episode: Episode) {
          hero(episode: $episode) {
            ...HeroDetails
          }
        }

        fragment HeroDetails on Character {
          ...HeroName
          ... on Human {
            height
          }
        }

        fragment HeroName on Character {
          name
        }

        fragment Unused on Character {
          id
        }
        "#,
    );
    insta::assert_snapshot!(operation(&ir, "Hero").source_with_fragments, @r###"
    query Hero($episode: Episode) {
      hero(episode: $episode) {
        ...HeroDetails
      }
    }

    fragment HeroDetails on Character {
      ...HeroName
      ... on Human {
        height
      }
    }

    fragment HeroName on Character {
      name
    }
    "###);
}

#[test]
fn builds_are_deterministic() {
    let source = r#"
        query Search($text: String, $withName: Boolean!) {
          search(text: $text) {
            ... on Human {
              name @include(if: $withName)
              ...HumanDetails
            }
            ... on Starship {
              name
              length
            }
          }
        }

        fragment HumanDetails on Human {
          height(unit: FOOT)
          friends {
            id
          }
        }
    "#;
    let first = build(source);
    let second = build(source);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
