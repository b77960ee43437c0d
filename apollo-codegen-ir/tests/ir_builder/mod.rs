use apollo_codegen_ir::IrBuilder;
use apollo_codegen_ir::IrConfig;
use apollo_codegen_ir::error::IrError;
use apollo_codegen_ir::ir::IntermediateRepresentation;
use apollo_codegen_ir::ir::IrField;
use apollo_codegen_ir::ir::IrOperation;
use apollo_compiler::ExecutableDocument;
use apollo_compiler::Schema;
use apollo_compiler::validation::Valid;

mod assembly;
mod fragments;
mod operations;

const SCHEMA: &str = r#"
schema {
  query: Query
  mutation: Mutation
}

type Query {
  hero(episode: Episode): Character
  search(text: String): [SearchResult]
  starship(id: ID!): Starship
  reviews(episode: Episode!, filter: ReviewFilter): [Review]
  node(id: ID!): Node
}

type Mutation {
  createReview(episode: Episode, review: ReviewInput!): Review
}

"The episodes in the Star Wars trilogy"
enum Episode {
  NEWHOPE
  EMPIRE
  JEDI
}

enum LengthUnit {
  METER
  FOOT @deprecated
}

enum Color {
  RED
  GREEN
  BLUE
}

"An ISO-8601 encoded date"
scalar Date

scalar Unused

interface Node {
  id: ID!
}

interface Character implements Node {
  id: ID!
  name: String!
  friends: [Character]
  appearsIn: [Episode]!
}

type Human implements Character & Node {
  id: ID!
  name: String!
  friends: [Character]
  appearsIn: [Episode]!
  height(unit: LengthUnit = METER): Float
  homePlanet: String
  starships: [Starship]
}

type Droid implements Character & Node {
  id: ID!
  name: String!
  friends: [Character]
  appearsIn: [Episode]!
  primaryFunction: String @deprecated(reason: "Use `role`")
}

type Starship implements Node {
  id: ID!
  name: String!
  length(unit: LengthUnit = METER): Float
  coordinates: [[Float!]!]
}

union SearchResult = Starship | Human

type Review {
  stars: Int!
  commentary: String
  createdAt: Date
}

"The input object sent when someone is creating a new review"
input ReviewInput {
  stars: Int!
  commentary: String
  favoriteColor: ColorInput
}

input ColorInput {
  red: Int!
  green: Int!
  blue: Int!
}

input ReviewFilter {
  minStars: Int = 0
  ratio: Float = 1
}
"#;

fn schema() -> Valid<Schema> {
    Schema::parse_and_validate(SCHEMA, "schema.graphqls").unwrap()
}

/// Parses and validates a document of operations and fragments.
fn document(schema: &Valid<Schema>, source: &str) -> ExecutableDocument {
    ExecutableDocument::parse_and_validate(schema, source, "operations.graphql")
        .unwrap()
        .into_inner()
}

/// Parses a document without validating it, for documents that validation rejects but the IR
/// builder must handle: split fragment sets and invalid queries.
fn unvalidated_document(schema: &Valid<Schema>, source: &str, path: &str) -> ExecutableDocument {
    ExecutableDocument::parse(schema, source, path).unwrap_or_else(|invalid| invalid.partial)
}

fn build(source: &str) -> IntermediateRepresentation {
    try_build(source).unwrap()
}

fn try_build(source: &str) -> Result<IntermediateRepresentation, IrError> {
    let schema = schema();
    let document = unvalidated_document(&schema, source, "operations.graphql");
    IrBuilder::new(&schema, IrConfig::default())
        .document(&document)
        .build()
}

fn operation<'a>(ir: &'a IntermediateRepresentation, name: &str) -> &'a IrOperation {
    ir.operations
        .iter()
        .find(|operation| operation.name.as_str() == name)
        .unwrap_or_else(|| panic!("no operation `{name}`"))
}

/// Follows response names from the base shape of `field`.
fn field<'a>(field: &'a IrField, response_names: &[&str]) -> &'a IrField {
    response_names.iter().fold(field, |field, response_name| {
        field
            .base_field_set()
            .and_then(|field_set| field_set.field(response_name))
            .unwrap_or_else(|| panic!("no field `{response_name}` under `{}`", field.name))
    })
}

fn response_names(fields: &[IrField]) -> Vec<&str> {
    fields
        .iter()
        .map(|field| field.response_name().as_str())
        .collect()
}
