//! Serialization of the target model, one text unit per internal module.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use restbridge_core::{BridgeError, Result};

use crate::generator::ImplementationGenerator;
use crate::tsmodel::{
    ComplexKind, TsClass, TsDecl, TsEnum, TsMethod, TsModule, TypeModel,
};

const BANNER: &str = "// Auto-generated by restbridge - DO NOT EDIT\n";

/// A module rendered to text, ready to be written to disk.
#[derive(Debug, Clone)]
pub struct RenderedModule {
    /// Module name; the file is `<name>.ts`.
    pub name: String,

    /// Output directory, relative to the output root.
    pub path: PathBuf,

    /// Rendered source text.
    pub content: String,
}

impl RenderedModule {
    /// File name of the rendered unit.
    pub fn file_name(&self) -> String {
        format!("{}.ts", self.name)
    }
}

/// Serializes a [`TypeModel`], delegating method bodies to the
/// implementation generator.
pub struct Renderer<'a> {
    generator: &'a dyn ImplementationGenerator,
}

impl<'a> Renderer<'a> {
    /// Create a renderer over a generator.
    pub fn new(generator: &'a dyn ImplementationGenerator) -> Self {
        Self { generator }
    }

    /// Render every internal module that owns declarations.
    ///
    /// External modules are import targets only; registered internal
    /// modules without declarations (e.g. a hand-written URL service) are
    /// left alone.
    pub fn render_model(&self, model: &TypeModel) -> Result<Vec<RenderedModule>> {
        model
            .modules()
            .iter()
            .filter(|m| !m.spec.external && !m.decls.is_empty())
            .map(|module| {
                Ok(RenderedModule {
                    name: module.spec.name.clone(),
                    path: module.spec.path.clone(),
                    content: self.render_module(module, model)?,
                })
            })
            .collect()
    }

    /// Render one module: banner, imports, declarations.
    pub fn render_module(&self, module: &TsModule, model: &TypeModel) -> Result<String> {
        let mut out = String::new();
        out.push_str(BANNER);

        let imports = self.collect_imports(module, model);
        if !imports.is_empty() {
            out.push('\n');
            for (import_path, names) in &imports {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                out.push_str(&format!(
                    "import {{ {} }} from '{}';\n",
                    names.join(", "),
                    import_path
                ));
            }
        }

        for decl in &module.decls {
            out.push('\n');
            match decl {
                TsDecl::Class(class) => out.push_str(&self.render_class(class)?),
                TsDecl::Enum(enum_decl) => out.push_str(&render_enum(enum_decl)),
            }
        }

        Ok(out)
    }

    /// Per-file imports: the union of scoped usages across the module's
    /// declarations, grouped by target module, names sorted.
    fn collect_imports(
        &self,
        module: &TsModule,
        model: &TypeModel,
    ) -> BTreeMap<String, BTreeSet<String>> {
        let mut imports: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for decl in &module.decls {
            let class = match decl {
                TsDecl::Class(class) => class,
                TsDecl::Enum(_) => continue,
            };
            for usage in &class.scoped_usages {
                if usage.module == module.spec.name {
                    continue;
                }
                let import_path = match model.module_spec(&usage.module) {
                    // Internal module: relative path from the consuming
                    // module's directory.
                    Some(spec) if !spec.external => {
                        relative_module_path(&module.spec.path, &spec.path, &spec.name)
                    }
                    // Library module: imported by name.
                    _ => usage.module.clone(),
                };
                imports
                    .entry(import_path)
                    .or_default()
                    .insert(usage.name.clone());
            }
        }

        imports
    }

    fn render_class(&self, class: &TsClass) -> Result<String> {
        let mut out = String::new();

        for decorator in &class.decorators {
            out.push_str(&decorator.to_typescript());
            out.push('\n');
        }

        let keyword = match class.kind {
            ComplexKind::Class => "class",
            ComplexKind::Interface => "interface",
        };
        match &class.superclass {
            Some(superclass) => out.push_str(&format!(
                "export {} {} extends {} {{\n",
                keyword, class.name, superclass.name
            )),
            None => out.push_str(&format!("export {} {} {{\n", keyword, class.name)),
        }

        for field in &class.fields {
            let marker = if field.optional { "?" } else { "" };
            let mut ty = field.ty.to_typescript();
            if field.nullable {
                ty.push_str(" | null");
            }
            out.push_str(&format!("  {}{}: {};\n", field.name, marker, ty));
        }

        for method in &class.methods {
            out.push('\n');
            out.push_str(&self.render_method(class, method)?);
        }

        out.push_str("}\n");
        Ok(out)
    }

    fn render_method(&self, class: &TsClass, method: &TsMethod) -> Result<String> {
        let mut out = String::new();

        for decorator in &method.decorators {
            out.push_str("  ");
            out.push_str(&decorator.to_typescript());
            out.push('\n');
        }

        let params: Vec<String> = method
            .params
            .iter()
            .map(|p| {
                let marker = if p.optional { "?" } else { "" };
                let mut ty = p.ty.to_typescript();
                if p.nullable {
                    ty.push_str(" | null");
                }
                format!("{}{}: {}", p.name, marker, ty)
            })
            .collect();
        let params = params.join(", ");

        let signature = if method.constructor {
            format!("constructor({})", params)
        } else {
            format!(
                "{}({}): {}",
                method.name,
                params,
                method.return_type.to_typescript()
            )
        };

        if class.kind == ComplexKind::Interface {
            out.push_str(&format!("  {};\n", signature));
            return Ok(out);
        }

        let mut body = Vec::new();
        self.generator.write_method(&mut body, class, method)?;
        let body = String::from_utf8(body)
            .map_err(|e| BridgeError::Rendering(format!("non-UTF-8 method body: {}", e)))?;

        out.push_str(&format!("  {} {{\n", signature));
        for line in body.lines() {
            if line.is_empty() {
                out.push('\n');
            } else {
                out.push_str(&format!("    {}\n", line));
            }
        }
        out.push_str("  }\n");

        Ok(out)
    }
}

/// Relative import path from one module directory to another.
fn relative_module_path(from: &Path, to: &Path, name: &str) -> String {
    let from: Vec<Component> = from.components().collect();
    let to: Vec<Component> = to.components().collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from.len() {
        parts.push("..".to_string());
    }
    for component in &to[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }
    let relative = parts.is_empty() || parts[0] != "..";
    parts.push(name.to_string());

    if relative {
        format!("./{}", parts.join("/"))
    } else {
        parts.join("/")
    }
}

fn render_enum(enum_decl: &TsEnum) -> String {
    let mut out = String::new();
    out.push_str(&format!("export enum {} {{\n", enum_decl.name));
    for value in &enum_decl.values {
        out.push_str(&format!("  {} = '{}',\n", value, value));
    }
    out.push_str("}\n");
    out
}
