// self
use crate::{
	_prelude::*,
	dispatch::{Body, Dispatcher, RequestOptions},
	http::HttpTransport,
	service::{ServiceEndpoint, ServiceKind},
};

/// Dispatcher handle pinned to one service's base URL.
///
/// Every call overrides `options.base_url` with the bound endpoint; behavior is otherwise
/// identical to the matching [`Dispatcher`] method.
pub struct ServiceClient<'a, T>
where
	T: ?Sized + HttpTransport,
{
	dispatcher: &'a Dispatcher<T>,
	endpoint: &'a ServiceEndpoint,
}
impl<'a, T> ServiceClient<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) fn new(dispatcher: &'a Dispatcher<T>, endpoint: &'a ServiceEndpoint) -> Self {
		Self { dispatcher, endpoint }
	}

	/// Service this handle is bound to.
	pub fn kind(&self) -> ServiceKind {
		self.endpoint.kind
	}

	/// Base URL this handle is bound to.
	pub fn base_url(&self) -> &Url {
		&self.endpoint.base_url
	}

	/// Performs one logical request against the bound service.
	pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Body> {
		self.dispatcher.request(path, self.bind(options)).await
	}

	/// Issues a `GET`.
	pub async fn get(&self, path: &str, options: RequestOptions) -> Result<Body> {
		self.dispatcher.get(path, self.bind(options)).await
	}

	/// Issues a `DELETE`.
	pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<Body> {
		self.dispatcher.delete(path, self.bind(options)).await
	}

	/// Issues a `POST` without a body.
	pub async fn post(&self, path: &str, options: RequestOptions) -> Result<Body> {
		self.dispatcher.post(path, self.bind(options)).await
	}

	/// Issues a `PUT` without a body.
	pub async fn put(&self, path: &str, options: RequestOptions) -> Result<Body> {
		self.dispatcher.put(path, self.bind(options)).await
	}

	/// Issues a `PATCH` without a body.
	pub async fn patch(&self, path: &str, options: RequestOptions) -> Result<Body> {
		self.dispatcher.patch(path, self.bind(options)).await
	}

	/// Issues a `POST` with a JSON body.
	pub async fn post_json<B>(&self, path: &str, body: &B, options: RequestOptions) -> Result<Body>
	where
		B: ?Sized + Serialize,
	{
		self.dispatcher.post_json(path, body, self.bind(options)).await
	}

	/// Issues a `PUT` with a JSON body.
	pub async fn put_json<B>(&self, path: &str, body: &B, options: RequestOptions) -> Result<Body>
	where
		B: ?Sized + Serialize,
	{
		self.dispatcher.put_json(path, body, self.bind(options)).await
	}

	/// Issues a `PATCH` with a JSON body.
	pub async fn patch_json<B>(&self, path: &str, body: &B, options: RequestOptions) -> Result<Body>
	where
		B: ?Sized + Serialize,
	{
		self.dispatcher.patch_json(path, body, self.bind(options)).await
	}

	fn bind(&self, options: RequestOptions) -> RequestOptions {
		options.with_base_url(self.endpoint.base_url.clone())
	}
}
impl<T> Clone for ServiceClient<'_, T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		*self
	}
}
impl<T> Copy for ServiceClient<'_, T> where T: ?Sized + HttpTransport {}
impl<T> Debug for ServiceClient<'_, T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ServiceClient")
			.field("kind", &self.endpoint.kind)
			.field("base_url", &self.endpoint.base_url.as_str())
			.finish()
	}
}
