use crate::errors::ItemResult;
use crate::model::ExecutionContext;

/// Fuente de items de un step.
///
/// `read` devuelve `Ok(None)` al agotarse la entrada; eso termina el bucle del
/// step con normalidad. Una instancia pertenece a una única ejecución de step.
///
/// `open`/`update`/`close` son ganchos opcionales de estado: `update` se
/// llama justo antes de cada commit con el contexto del step, `open` recibe
/// ese mismo contexto (restaurado en un reinicio).
pub trait ItemReader<T> {
    fn read(&mut self) -> ItemResult<Option<T>>;

    fn open(&mut self, _ctx: &ExecutionContext) -> ItemResult<()> {
        Ok(())
    }

    fn update(&mut self, _ctx: &mut ExecutionContext) {}

    fn close(&mut self) {}
}

impl<T, F> ItemReader<T> for F where F: FnMut() -> ItemResult<Option<T>>
{
    fn read(&mut self) -> ItemResult<Option<T>> {
        self()
    }
}
