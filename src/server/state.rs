use crate::pipeline::Converter;

pub(crate) struct ServerState<T, A> {
    pub(crate) converter: Converter<T, A>,
}
