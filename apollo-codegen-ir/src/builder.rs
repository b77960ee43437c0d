use apollo_compiler::ExecutableDocument;
use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::Schema;
use apollo_compiler::executable::Fragment;
use apollo_compiler::executable::Operation;
use apollo_compiler::parser::SourceMap;
use apollo_compiler::parser::SourceSpan;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::validation::Valid;
use indexmap::IndexMap;
use indexmap::IndexSet;
use tracing::debug;

use crate::coercion::coerce;
use crate::config::IrConfig;
use crate::error::IrError;
use crate::error::UserQueryError;
use crate::field_set::FieldSetBuilder;
use crate::field_set::FragmentDefinitions;
use crate::field_set::used_fragments;
use crate::ir::IntermediateRepresentation;
use crate::ir::IrCustomScalar;
use crate::ir::IrEnum;
use crate::ir::IrEnumValue;
use crate::ir::IrInputField;
use crate::ir::IrInputObject;
use crate::ir::IrNamedFragment;
use crate::ir::IrOperation;
use crate::ir::IrVariable;
use crate::ir::ModelPath;
use crate::ir::ModelPathRoot;
use crate::possible_types::PossibleTypes;
use crate::used_types::UsedTypes;
use crate::utils::DirectiveListExt;
use crate::utils::logging::snapshot;
use crate::variables::infer_fragment_variables;

/// Builds the [`IntermediateRepresentation`] of a set of documents against a schema.
///
/// ```ignore
/// let ir = IrBuilder::new(&schema, IrConfig::default())
///     .document(&operations)
///     .metadata_document(&upstream_fragments)
///     .build()?;
/// ```
pub struct IrBuilder<'a> {
    schema: &'a Valid<Schema>,
    config: IrConfig,
    documents: Vec<&'a ExecutableDocument>,
    metadata_documents: Vec<&'a ExecutableDocument>,
}

/// Where a named fragment is defined.
struct FragmentSource<'a> {
    fragment: &'a Node<Fragment>,
    sources: &'a SourceMap,
    generate: bool,
}

impl<'a> IrBuilder<'a> {
    pub fn new(schema: &'a Valid<Schema>, config: IrConfig) -> Self {
        Self {
            schema,
            config,
            documents: Vec::new(),
            metadata_documents: Vec::new(),
        }
    }

    /// Adds a document of the user's operations and fragments. Every operation and fragment it
    /// defines is part of the output.
    pub fn document(mut self, document: &'a ExecutableDocument) -> Self {
        self.documents.push(document);
        self
    }

    /// Adds a document of fragments compiled elsewhere, such as in an upstream module.
    ///
    /// Its fragments can be spread by the user's documents and appear in
    /// [`IntermediateRepresentation::all_named_fragments`] but not in
    /// [`IntermediateRepresentation::named_fragments_to_generate`]. Its operations are ignored.
    /// A user fragment with the same name takes precedence.
    pub fn metadata_document(mut self, document: &'a ExecutableDocument) -> Self {
        self.metadata_documents.push(document);
        self
    }

    /// # Errors
    ///
    /// Fails on the first invalid operation, fragment or value. No partial output is produced.
    pub fn build(self) -> Result<IntermediateRepresentation, IrError> {
        let schema: &Schema = self.schema;
        let possible_types = PossibleTypes::new(schema);
        let mut used_types = UsedTypes::default();

        let mut sources: IndexMap<Name, FragmentSource<'_>> = IndexMap::new();
        for document in &self.documents {
            for (name, fragment) in &document.fragments {
                sources.insert(
                    name.clone(),
                    FragmentSource {
                        fragment,
                        sources: &document.sources,
                        generate: true,
                    },
                );
            }
        }
        for document in &self.metadata_documents {
            for (name, fragment) in &document.fragments {
                sources.entry(name.clone()).or_insert(FragmentSource {
                    fragment,
                    sources: &document.sources,
                    generate: false,
                });
            }
        }
        let fragments: FragmentDefinitions<'_> = sources
            .iter()
            .map(|(name, source)| (name.clone(), source.fragment))
            .collect();

        let mut build_order = IndexSet::new();
        for name in fragments.keys() {
            fragment_build_order(name, &fragments, &mut IndexSet::new(), &mut build_order)?;
        }
        let mut built_fragments: IndexMap<Name, IrNamedFragment> = IndexMap::new();
        for name in build_order {
            let Some(source) = sources.get(&name) else {
                return Err(UserQueryError::UnknownFragment(name).into());
            };
            let fragment = build_fragment(
                FieldSetBuilder {
                    schema,
                    fragments: &fragments,
                    built_fragments: &built_fragments,
                    possible_types: &possible_types,
                    used_types: &mut used_types,
                },
                source,
            )?;
            debug!(
                fragment = %fragment.name,
                variables = fragment.variables.len(),
                "built fragment"
            );
            snapshot!(fragment, "named fragment");
            built_fragments.insert(name, fragment);
        }

        let mut operations = Vec::new();
        for document in &self.documents {
            for operation in document.operations.iter() {
                let operation = build_operation(
                    FieldSetBuilder {
                        schema,
                        fragments: &fragments,
                        built_fragments: &built_fragments,
                        possible_types: &possible_types,
                        used_types: &mut used_types,
                    },
                    operation,
                    &document.sources,
                )?;
                debug!(
                    operation = %operation.name,
                    operation_type = %operation.operation_type,
                    variables = operation.variables.len(),
                    "built operation"
                );
                snapshot!(operation, "operation");
                operations.push(operation);
            }
        }

        // Every operation and fragment must be built before used types are read.
        let assembly = assemble(schema, &self.config, &mut used_types)?;
        debug!(
            input_objects = assembly.input_objects.len(),
            enums = assembly.enums.len(),
            custom_scalars = assembly.custom_scalars.len(),
            "assembled used types"
        );

        let named_fragments_to_generate = sources
            .iter()
            .filter(|(_, source)| source.generate)
            .map(|(name, _)| name.clone())
            .collect();
        let all_named_fragments = sources
            .keys()
            .filter_map(|name| built_fragments.swap_remove(name))
            .collect();
        Ok(IntermediateRepresentation {
            operations,
            all_named_fragments,
            named_fragments_to_generate,
            input_objects: assembly.input_objects,
            enums: assembly.enums,
            custom_scalars: assembly.custom_scalars,
        })
    }
}

/// Adds the fragments `name` depends on, then `name`, to `order`.
fn fragment_build_order(
    name: &Name,
    fragments: &FragmentDefinitions<'_>,
    in_progress: &mut IndexSet<Name>,
    order: &mut IndexSet<Name>,
) -> Result<(), UserQueryError> {
    if order.contains(name) || !in_progress.insert(name.clone()) {
        return Ok(());
    }
    let Some(fragment) = fragments.get(name) else {
        return Err(UserQueryError::UnknownFragment(name.clone()));
    };
    let mut dependencies = IndexSet::new();
    used_fragments(&fragment.selection_set, fragments, &mut dependencies)?;
    for dependency in &dependencies {
        fragment_build_order(dependency, fragments, in_progress, order)?;
    }
    order.insert(name.clone());
    Ok(())
}

fn build_fragment<'a>(
    mut field_sets: FieldSetBuilder<'a>,
    source: &FragmentSource<'a>,
) -> Result<IrNamedFragment, IrError> {
    let fragment = source.fragment;
    let mut variables = Vec::new();
    for (name, ty) in infer_fragment_variables(field_sets.schema, fragment, field_sets.fragments)? {
        variables.push(IrVariable {
            name,
            default_value: None,
            ty: field_sets.used_types.map_type(field_sets.schema, &ty)?,
        });
    }
    let root = ModelPath::new(fragment.name.as_str(), ModelPathRoot::Fragment);
    let data_field = field_sets.build_data_field(&fragment.selection_set, root)?;
    Ok(IrNamedFragment {
        name: fragment.name.clone(),
        type_condition: fragment.type_condition().clone(),
        variables,
        data_field,
        file_path: file_path(fragment.location(), source.sources),
    })
}

fn build_operation<'a>(
    mut field_sets: FieldSetBuilder<'a>,
    operation: &'a Node<Operation>,
    sources: &SourceMap,
) -> Result<IrOperation, IrError> {
    let schema = field_sets.schema;
    let Some(name) = &operation.name else {
        return Err(UserQueryError::AnonymousOperation.into());
    };
    let Some(type_condition) = schema.root_operation(operation.operation_type) else {
        return Err(IrError::MissingRootType {
            operation: name.clone(),
            operation_type: operation.operation_type.into(),
        });
    };

    let mut variables = Vec::with_capacity(operation.variables.len());
    for variable in &operation.variables {
        let default_value = variable
            .default_value
            .as_ref()
            .map(|default_value| coerce(default_value, &variable.ty, schema))
            .transpose()?;
        variables.push(IrVariable {
            name: variable.name.clone(),
            default_value,
            ty: field_sets.used_types.map_type(schema, &variable.ty)?,
        });
    }

    let root = ModelPath::new(name.as_str(), ModelPathRoot::OperationImplementation);
    let data_field = field_sets.build_data_field(&operation.selection_set, root)?;

    let mut used = IndexSet::new();
    used_fragments(&operation.selection_set, field_sets.fragments, &mut used)?;
    let fragment_texts = used
        .iter()
        .filter_map(|name| field_sets.fragments.get(name))
        .map(|fragment| fragment.serialize().to_string());
    let source_with_fragments = std::iter::once(operation.serialize().to_string())
        .chain(fragment_texts)
        .map(|text| text.trim_end_matches('\n').to_owned())
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(IrOperation {
        name: name.clone(),
        operation_type: operation.operation_type.into(),
        type_condition: type_condition.clone(),
        variables,
        data_field,
        source_with_fragments,
        file_path: file_path(operation.location(), sources),
    })
}

fn file_path(location: Option<SourceSpan>, sources: &SourceMap) -> String {
    location
        .and_then(|location| sources.get(&location.file_id()))
        .map(|source| source.path().display().to_string())
        .unwrap_or_default()
}

struct Assembly {
    input_objects: Vec<IrInputObject>,
    enums: Vec<IrEnum>,
    custom_scalars: Vec<IrCustomScalar>,
}

/// Selects the schema's enums, input objects and custom scalars to generate: the used ones and
/// the ones the configuration asks for, with the types used by their input fields. Output follows
/// schema declaration order.
fn assemble(
    schema: &Schema,
    config: &IrConfig,
    used_types: &mut UsedTypes,
) -> Result<Assembly, IrError> {
    for (name, definition) in &schema.types {
        if !definition.is_built_in() && config.should_always_generate(name) {
            used_types.mark(name, definition);
        }
    }

    let mut input_objects: IndexMap<Name, IrInputObject> = IndexMap::new();
    loop {
        let pending: Vec<Name> = used_types
            .input_objects()
            .iter()
            .filter(|name| !input_objects.contains_key(*name))
            .cloned()
            .collect();
        if pending.is_empty() {
            break;
        }
        for name in pending {
            let Some(ExtendedType::InputObject(definition)) = schema.types.get(&name) else {
                return Err(UserQueryError::UnknownType(name).into());
            };
            let mut fields = Vec::with_capacity(definition.fields.len());
            for (field_name, field) in &definition.fields {
                let default_value = field
                    .default_value
                    .as_ref()
                    .map(|default_value| coerce(default_value, &field.ty, schema))
                    .transpose()?;
                fields.push(IrInputField {
                    name: field_name.clone(),
                    description: field.description.as_ref().map(|text| text.to_string()),
                    deprecation_reason: field.directives.deprecation_reason(),
                    ty: used_types.map_type(schema, &field.ty)?,
                    default_value,
                });
            }
            input_objects.insert(
                name.clone(),
                IrInputObject {
                    name,
                    description: definition.description.as_ref().map(|text| text.to_string()),
                    deprecation_reason: definition.directives.deprecation_reason(),
                    fields,
                },
            );
        }
    }

    let mut assembly = Assembly {
        input_objects: Vec::new(),
        enums: Vec::new(),
        custom_scalars: Vec::new(),
    };
    for (name, definition) in &schema.types {
        if definition.is_built_in() {
            continue;
        }
        match definition {
            ExtendedType::InputObject(_) => {
                if let Some(input_object) = input_objects.swap_remove(name) {
                    assembly.input_objects.push(input_object);
                }
            }
            ExtendedType::Enum(definition) if used_types.enums().contains(name) => {
                assembly.enums.push(IrEnum {
                    name: name.clone(),
                    description: definition.description.as_ref().map(|text| text.to_string()),
                    values: definition
                        .values
                        .values()
                        .map(|value| IrEnumValue {
                            name: value.value.clone(),
                            description: value.description.as_ref().map(|text| text.to_string()),
                            deprecation_reason: value.directives.deprecation_reason(),
                        })
                        .collect(),
                });
            }
            ExtendedType::Scalar(definition) if used_types.custom_scalars().contains(name) => {
                assembly.custom_scalars.push(IrCustomScalar {
                    name: name.clone(),
                    description: definition.description.as_ref().map(|text| text.to_string()),
                });
            }
            _ => {}
        }
    }
    Ok(assembly)
}
