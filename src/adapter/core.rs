use crate::dispatcher::Exchange;
use crate::error::DispatchError;
use crate::handler::Handler;
use crate::model::ModelMap;
use crate::view::ViewResult;
use std::sync::Arc;
use tracing::debug;

/// Result of running a handler through its adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Handled {
    /// The dispatcher still has to render or redirect.
    View(ViewResult),
    /// The handler wrote the response itself.
    Committed,
}

/// Bridges one handler call style to the dispatcher's uniform contract.
///
/// Adapters are stateless and registered once. `supports` must be total and
/// side-effect free. `handle` must not swallow handler errors.
pub trait HandlerAdapter: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn supports(&self, handler: &Handler) -> bool;

    fn handle(
        &self,
        exchange: &mut Exchange<'_>,
        handler: &Handler,
    ) -> Result<Handled, DispatchError>;
}

fn unsupported(handler: &Handler) -> DispatchError {
    DispatchError::NoAdapter {
        kind: handler.kind().as_str(),
    }
}

/// Runs [`Handler::Raw`] controllers against the live exchange.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawControllerAdapter;

impl HandlerAdapter for RawControllerAdapter {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn supports(&self, handler: &Handler) -> bool {
        matches!(handler, Handler::Raw(_))
    }

    fn handle(
        &self,
        exchange: &mut Exchange<'_>,
        handler: &Handler,
    ) -> Result<Handled, DispatchError> {
        let Handler::Raw(controller) = handler else {
            return Err(unsupported(handler));
        };
        controller.process(exchange)?;
        Ok(Handled::Committed)
    }
}

/// Builds a [`ParamMap`](crate::model::ParamMap) and passes the handler's
/// [`ViewResult`] through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParamControllerAdapter;

impl HandlerAdapter for ParamControllerAdapter {
    fn name(&self) -> &'static str {
        "params"
    }

    fn supports(&self, handler: &Handler) -> bool {
        matches!(handler, Handler::Params(_))
    }

    fn handle(
        &self,
        exchange: &mut Exchange<'_>,
        handler: &Handler,
    ) -> Result<Handled, DispatchError> {
        let Handler::Params(controller) = handler else {
            return Err(unsupported(handler));
        };
        let params = exchange.params();
        debug!(param_count = params.len(), "Param map built");
        Ok(Handled::View(controller.process(&params)?))
    }
}

/// Owns the [`ModelMap`] for model-style handlers and pairs it with the view
/// name they return.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelControllerAdapter;

impl HandlerAdapter for ModelControllerAdapter {
    fn name(&self) -> &'static str {
        "params_and_model"
    }

    fn supports(&self, handler: &Handler) -> bool {
        matches!(handler, Handler::ParamsAndModel(_))
    }

    fn handle(
        &self,
        exchange: &mut Exchange<'_>,
        handler: &Handler,
    ) -> Result<Handled, DispatchError> {
        let Handler::ParamsAndModel(controller) = handler else {
            return Err(unsupported(handler));
        };
        let params = exchange.params();
        let mut model = ModelMap::new();
        let view = controller.process(&params, &mut model)?;
        debug!(
            view = %view,
            model_attributes = model.len(),
            "Model controller returned view"
        );
        Ok(Handled::View(ViewResult::render(view, model)))
    }
}

/// Serves fixed-view handlers.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticViewAdapter;

impl HandlerAdapter for StaticViewAdapter {
    fn name(&self) -> &'static str {
        "static_view"
    }

    fn supports(&self, handler: &Handler) -> bool {
        matches!(handler, Handler::StaticView(_))
    }

    fn handle(
        &self,
        _exchange: &mut Exchange<'_>,
        handler: &Handler,
    ) -> Result<Handled, DispatchError> {
        let Handler::StaticView(view) = handler else {
            return Err(unsupported(handler));
        };
        Ok(Handled::View(ViewResult::view(view.clone())))
    }
}

/// One adapter per [`HandlerKind`](crate::handler::HandlerKind), in a fixed order.
#[must_use]
pub fn default_adapters() -> Vec<Arc<dyn HandlerAdapter>> {
    vec![
        Arc::new(ParamControllerAdapter),
        Arc::new(ModelControllerAdapter),
        Arc::new(RawControllerAdapter),
        Arc::new(StaticViewAdapter),
    ]
}

