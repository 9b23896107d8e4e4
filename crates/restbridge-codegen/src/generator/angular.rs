//! Angular 4 / RxJS client generator.
//!
//! Lowers REST endpoint methods into `HttpClient.request(...)` calls whose
//! single eventual outcome is bridged onto an RxJS `Subject`; the generated
//! method returns the subject's read-only `Observable` view.

use std::io::Write;

use restbridge_core::descriptor::{HttpVerb, ParamBinding};
use restbridge_core::{BridgeError, Result};

use crate::tsmodel::{
    ModuleSpec, TsClass, TsDecorator, TsField, TsMethod, TsParameter, TsType, TypeRef,
};

use super::ImplementationGenerator;

const FIELD_HTTP_SERVICE: &str = "httpService";
const FIELD_URL_SERVICE: &str = "urlService";
const SUBJECT_VAR: &str = "subject";

/// Concrete generator targeting Angular's `HttpClient` and RxJS.
#[derive(Debug, Clone, Default)]
pub struct AngularGenerator {
    url_service: Option<ModuleSpec>,
}

impl AngularGenerator {
    /// Create a generator without a backend URL service; paths are emitted
    /// as bare string literals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every generated path with `this.urlService.getBackendUrl()`,
    /// importing `UrlService` from the given internal module.
    pub fn with_url_service(mut self, module: ModuleSpec) -> Self {
        self.url_service = Some(module);
        self
    }

    /// The URL service module, if configured. The engine registers it in
    /// the model so imports resolve to a relative path.
    pub fn url_service_module(&self) -> Option<&ModuleSpec> {
        self.url_service.as_ref()
    }

    fn observable() -> TypeRef {
        TypeRef::new("rxjs/Observable", "Observable")
    }

    fn subject() -> TypeRef {
        TypeRef::new("rxjs/Subject", "Subject")
    }

    fn http_client() -> TypeRef {
        TypeRef::new("@angular/common/http", "HttpClient")
    }

    fn http_params() -> TypeRef {
        TypeRef::new("@angular/common/http", "HttpParams")
    }

    fn http_headers() -> TypeRef {
        TypeRef::new("@angular/common/http", "HttpHeaders")
    }

    fn injectable() -> TypeRef {
        TypeRef::new("@angular/core", "Injectable")
    }

    fn url_service_ref(&self) -> Option<TypeRef> {
        self.url_service
            .as_ref()
            .map(|m| TypeRef::new(m.name.clone(), "UrlService"))
    }

    /// Class-level path template concatenated with the method-level one,
    /// optionally prefixed by the URL service call.
    fn compose_path(&self, class: &TsClass, method: &TsMethod) -> String {
        let class_path = class.endpoint.as_ref().map(|e| e.path()).unwrap_or("");
        let method_path = method.endpoint.as_ref().map(|e| e.path()).unwrap_or("");
        if self.url_service.is_some() {
            format!(
                "this.{}.getBackendUrl() + '{}{}'",
                FIELD_URL_SERVICE, class_path, method_path
            )
        } else {
            format!("'{}{}'", class_path, method_path)
        }
    }

    /// The payload type the success handler coerces to: the argument of our
    /// own `Observable` wrapper, or the return type itself if unwrapped.
    fn response_payload<'a>(&self, ty: &'a TsType) -> &'a TsType {
        if let TsType::Parameterized { base, args } = ty {
            if *base == Self::observable() && args.len() == 1 {
                return &args[0];
            }
        }
        ty
    }
}

/// Result of classifying a method's parameters against the path template.
struct BoundCall {
    /// Path expression with placeholders spliced.
    path: String,
    /// Name of the body-bound parameter, if any.
    body: Option<String>,
    /// Query-parameter statements following `let params = new HttpParams();`.
    param_lines: Vec<String>,
}

/// Classify parameters and splice path placeholders.
///
/// Each parameter carries at most one binding; the body-bound parameter is
/// located up front because PUT-by-entity endpoints take the path id from
/// the body entity's own id field rather than a separate id argument.
fn bind_parameters(path: String, method: &TsMethod, verb: HttpVerb) -> BoundCall {
    let body = method
        .params
        .iter()
        .find(|p| matches!(p.binding, Some(ParamBinding::Body)))
        .map(|p| p.name.clone());

    let mut path = path;
    let mut param_lines = Vec::new();

    for param in &method.params {
        match &param.binding {
            Some(ParamBinding::Path { name }) => {
                let placeholder = name.as_deref().unwrap_or(&param.name);
                let target = format!("{{{}}}", placeholder);
                let splice = if placeholder == "id" && verb == HttpVerb::Put {
                    let entity = body.as_deref().unwrap_or(&param.name);
                    format!("' + {}.id", entity)
                } else {
                    format!("' + {} + '", param.name)
                };
                replace_last(&mut path, &target, &splice);
            }
            Some(ParamBinding::Query { name }) => {
                let key = name.as_deref().unwrap_or(&param.name);
                let value = if param.ty == TsType::String {
                    param.name.clone()
                } else {
                    format!("{}.toString()", param.name)
                };
                let set_line = format!("params = params.set('{}', {});", key, value);
                if param.optional || param.nullable {
                    param_lines.push(format!(
                        "if ({} !== undefined && {} !== null) {{",
                        param.name, param.name
                    ));
                    param_lines.push(format!("  {}", set_line));
                    param_lines.push("}".to_string());
                } else {
                    param_lines.push(set_line);
                }
            }
            // Body was captured above; unbound parameters are left to the
            // caller.
            Some(ParamBinding::Body) | None => {}
        }
    }

    BoundCall {
        path,
        body,
        param_lines,
    }
}

/// Replace the last occurrence of `target` in `haystack`.
fn replace_last(haystack: &mut String, target: &str, replacement: &str) {
    if let Some(start) = haystack.rfind(target) {
        haystack.replace_range(start..start + target.len(), replacement);
    }
}

/// Assemble the trailing options argument from whichever parts exist.
fn compose_options(
    has_headers: bool,
    has_params: bool,
    has_body: bool,
    text_response: bool,
) -> String {
    let mut entries: Vec<&str> = Vec::new();
    if has_headers {
        entries.push("headers");
    }
    if has_params {
        entries.push("params");
    }
    if has_body {
        entries.push("body");
    }
    if text_response {
        entries.push("responseType: 'text'");
    }
    if entries.is_empty() {
        String::new()
    } else {
        format!(", {{{}}}", entries.join(", "))
    }
}

/// Success-handler fragment, coercing the raw response by payload type.
fn success_handler(payload: &TsType) -> &'static str {
    if *payload == TsType::Number {
        return ".next(res ? Number(res) : null),";
    }
    if *payload == TsType::Boolean {
        return ".next(res ? res.toLowerCase() === 'true' : false),";
    }
    ".next(res ? res : null),"
}

impl ImplementationGenerator for AngularGenerator {
    fn map_return_type(&self, class: &TsClass, _method: &TsMethod, ty: TsType) -> TsType {
        if class.rest {
            return TsType::Parameterized {
                base: Self::observable(),
                args: vec![ty],
            };
        }
        ty
    }

    fn implementation_specific_fields(&self, class: &TsClass) -> Vec<TsField> {
        if !class.rest {
            return Vec::new();
        }
        let mut fields = vec![TsField::new(
            FIELD_HTTP_SERVICE,
            TsType::Ref(Self::http_client()),
        )];
        if let Some(url_service) = self.url_service_ref() {
            fields.push(TsField::new(FIELD_URL_SERVICE, TsType::Ref(url_service)));
        }
        fields
    }

    fn implementation_specific_parameters(
        &self,
        class: &TsClass,
        method: &TsMethod,
    ) -> Vec<TsParameter> {
        if method.constructor && class.rest {
            return self
                .implementation_specific_fields(class)
                .into_iter()
                .map(|f| TsParameter::new(f.name, f.ty))
                .collect();
        }
        if let Some(verb) = method.endpoint.as_ref().and_then(|e| e.verb()) {
            if verb.is_mutation() {
                // Explicit override: mutation-verb endpoints never receive
                // injected parameters.
                return Vec::new();
            }
        }
        Vec::new()
    }

    fn class_decorators(&self, class: &TsClass) -> Vec<TsDecorator> {
        if class.rest {
            return vec![TsDecorator::new(Self::injectable())];
        }
        Vec::new()
    }

    fn complex_type_usages(&self, class: &TsClass) -> Vec<TypeRef> {
        if !class.rest {
            return Vec::new();
        }
        let mut usages = vec![
            Self::observable(),
            Self::http_client(),
            Self::http_params(),
            Self::http_headers(),
            Self::subject(),
            Self::injectable(),
        ];
        if let Some(url_service) = self.url_service_ref() {
            usages.push(url_service);
        }
        usages
    }

    fn write_method(&self, out: &mut dyn Write, class: &TsClass, method: &TsMethod) -> Result<()> {
        if method.constructor {
            for field in self.implementation_specific_fields(class) {
                writeln!(out, "this.{} = {};", field.name, field.name)?;
            }
            return Ok(());
        }

        let endpoint = match &method.endpoint {
            Some(endpoint) => endpoint,
            None if class.rest => {
                return Err(BridgeError::UnclassifiableMethod(method.name.clone()));
            }
            // Plain passthrough method on a model class: no body.
            None => return Ok(()),
        };
        let verb = endpoint
            .verb()
            .ok_or_else(|| BridgeError::UnclassifiableMethod(method.name.clone()))?;

        let call = bind_parameters(self.compose_path(class, method), method, verb);
        let headers = endpoint
            .consumes
            .first()
            .map(|media| format!("new HttpHeaders().set('Content-type', '{}');", media));
        let text_response = endpoint.produces.iter().any(|m| m == "text/plain");

        if let Some(body) = &call.body {
            writeln!(out, "let body = {};", body)?;
        }
        if !call.param_lines.is_empty() {
            writeln!(out, "let params = new HttpParams();")?;
            for line in &call.param_lines {
                writeln!(out, "{}", line)?;
            }
        }
        if let Some(headers) = &headers {
            writeln!(out, "let headers = {}", headers)?;
        }

        writeln!(out, "const {} = new Subject<any>();", SUBJECT_VAR)?;

        let options = compose_options(
            headers.is_some(),
            !call.param_lines.is_empty(),
            call.body.is_some(),
            text_response,
        );
        let handler = success_handler(self.response_payload(&method.return_type));
        writeln!(
            out,
            "this.{}.request('{}', {}{}).subscribe(res => {}{} (err) => {{{}.error(err ? err : {{}});}});",
            FIELD_HTTP_SERVICE, verb, call.path, options, SUBJECT_VAR, handler, SUBJECT_VAR
        )?;
        writeln!(out, "return {}.asObservable();", SUBJECT_VAR)?;

        Ok(())
    }
}
